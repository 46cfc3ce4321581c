//! Language-model provider client

pub mod client;
pub mod types;

pub use client::{ChatModel, OllamaChatClient};
pub use types::{ChatMessage, Role};
