pub mod chat;
pub mod documents;
pub mod health;
pub mod search;

pub use chat::chat;
pub use documents::{delete_document, ingest};
pub use health::{health, stats};
pub use search::search;
