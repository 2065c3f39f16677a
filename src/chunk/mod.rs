//! Chunk types.
//!
//! - [`Chunk`] - Reference-counted read buffer with length and last flag
//! - [`ChunkSource`] - Serial pull interface producing chunks
//! - [`ReaderSource`] - [`ChunkSource`] over any [`std::io::Read`]
//! - [`IterSource`] - [`ChunkSource`] over an iterator of chunks

mod data;
mod source;

pub use data::Chunk;
pub use source::{ChunkSource, IterSource, ReaderSource};
