//! Generation collaborator: chat-completion providers and the answer
//! facade the chat surface drives. This crate never decides what to
//! retrieve — it only turns a query plus retrieved chunks into prose.

pub mod generate;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use generate::{Exchange, Generator, LlmGenerator};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::{OllamaProvider, OpenAiProvider};
