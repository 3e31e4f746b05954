mod error;
mod llm_client;
mod providers;
mod retry;

pub use error::*;
pub use llm_client::*;
pub use providers::*;
pub use retry::*;
