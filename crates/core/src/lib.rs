pub mod config;
pub mod document;
pub mod label;
pub mod tuning;

pub use config::Config;
pub use document::*;
pub use label::*;
pub use tuning::{SizeBucket, Tuning};
