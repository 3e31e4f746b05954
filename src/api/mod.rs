/// API error types and handling
pub mod errors;
/// Request handlers for the question endpoint and health check
pub mod handlers;
/// Routes configuration and setup
pub mod routes;
/// HTTP server implementation
pub mod server;
