//! Boundary-safe overlapping text chunker.
//!
//! Splits a document into an ordered, gap-free sequence of chunks per a
//! computed [`ChunkingStrategy`](crate::strategy::ChunkingStrategy). Cuts
//! prefer paragraph breaks, then sentence ends, then whitespace within a
//! bounded tolerance window; only when none exists does a hard cut land at
//! the raw offset (still never inside a multi-byte character).

mod split;
mod types;

pub use split::chunk_text;
pub use types::Chunk;

#[cfg(test)]
mod tests;
