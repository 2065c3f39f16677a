//! Splitting engine.
//!
//! - [`Splitter`] - Turns a [`ChunkSource`](crate::ChunkSource) into ordered,
//!   line-aligned work units

mod engine;

pub use engine::Splitter;
