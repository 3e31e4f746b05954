//! Health assistant for community health workers.
//!
//! The gateway ([`api`]) relays questions to a generative-language service
//! behind a fixed, audited [`instruction::SystemInstruction`]. The
//! [`client`] keeps a chat transcript, cleans up answers and reads them
//! aloud when the device can.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod instruction;
pub mod llm;
pub mod utils;

pub use errors::Error;
