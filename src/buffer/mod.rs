//! Buffer management.
//!
//! Read buffers are large and long-lived, so they are pooled and shared by
//! every chunk read during a parse. See [`BufferPool`].

mod pool;

pub use pool::{BufferPool, DEFAULT_BUFFER_SIZE, DEFAULT_RETAIN_LIMIT};
