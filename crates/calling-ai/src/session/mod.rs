//! Conversation session management.
//!
//! A `Session` owns the transcript, the namespace and the fixed request
//! parameters, and runs the function-call loop for each `ask`.

mod chat;
mod manager;
mod types;


pub use manager::Session;
pub use types::Reply;
