//! Conversational client for the question-answering gateway.

mod conversation;
mod espeak;
mod gateway;
mod language;
mod message;
pub mod repl;
mod sanitize;
pub mod speech;

pub use conversation::*;
pub use espeak::EspeakSynthesizer;
pub use gateway::*;
pub use language::*;
pub use message::*;
pub use sanitize::sanitize;
