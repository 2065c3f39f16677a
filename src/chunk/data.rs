//! The Chunk type - a reference-counted read buffer.

use std::fmt;
use std::sync::Arc;

use crate::buffer::BufferPool;

type FreeFn = Box<dyn FnOnce(Vec<u8>) + Send + Sync>;

/// A buffer of raw input plus its valid length and end-of-stream flag.
///
/// `Chunk` is a cheap handle: cloning it registers one more user of the
/// underlying buffer and dropping a handle releases that use. When the last
/// handle goes away the free callback runs exactly once and receives the
/// buffer back, which for pooled chunks means returning it to the
/// [`BufferPool`]. Slices built over a chunk each hold their own handle, so
/// a buffer is never recycled while any slice still addresses it.
///
/// # Example
///
/// ```
/// use quickcsv::Chunk;
///
/// let chunk = Chunk::from_vec(b"a,b\nc,d\n".to_vec(), true);
/// assert_eq!(chunk.len(), 8);
/// assert!(chunk.is_last());
/// assert_eq!(chunk.use_count(), 1);
/// ```
#[derive(Clone)]
pub struct Chunk {
    inner: Arc<ChunkInner>,
}

struct ChunkInner {
    data: Vec<u8>,
    len: usize,
    last: bool,
    on_free: Option<FreeFn>,
}

impl Chunk {
    /// Creates a chunk over an owned buffer; `len` bytes of it are valid.
    ///
    /// `len` is clamped to the buffer length.
    pub fn new(data: Vec<u8>, len: usize, last: bool) -> Self {
        Self::build(data, len, last, None)
    }

    /// Creates a chunk whose whole buffer is valid.
    pub fn from_vec(data: Vec<u8>, last: bool) -> Self {
        let len = data.len();
        Self::new(data, len, last)
    }

    /// Creates a chunk that hands its buffer back to `pool` when freed.
    pub fn pooled(data: Vec<u8>, len: usize, last: bool, pool: Arc<BufferPool>) -> Self {
        Self::with_on_free(data, len, last, move |buf| pool.release(buf))
    }

    /// Creates a chunk with a custom free callback.
    ///
    /// The callback fires once, when the last handle is dropped.
    pub fn with_on_free<F>(data: Vec<u8>, len: usize, last: bool, on_free: F) -> Self
    where
        F: FnOnce(Vec<u8>) + Send + Sync + 'static,
    {
        Self::build(data, len, last, Some(Box::new(on_free)))
    }

    /// An empty chunk.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, false)
    }

    fn build(data: Vec<u8>, len: usize, last: bool, on_free: Option<FreeFn>) -> Self {
        let len = len.min(data.len());
        Self {
            inner: Arc::new(ChunkInner {
                data,
                len,
                last,
                on_free,
            }),
        }
    }

    /// The valid bytes of this chunk.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.data[..self.inner.len]
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Returns true if the chunk holds no valid bytes.
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Returns true if this is the final chunk of its source.
    pub fn is_last(&self) -> bool {
        self.inner.last
    }

    /// Number of live handles on this chunk.
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl Drop for ChunkInner {
    fn drop(&mut self) {
        if let Some(on_free) = self.on_free.take() {
            on_free(std::mem::take(&mut self.data));
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("len", &self.len())
            .field("last", &self.is_last())
            .field("uses", &self.use_count())
            .finish()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes", self.len())?;
        if self.is_last() {
            write!(f, ", last")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_new_clamps_len() {
        let chunk = Chunk::new(b"hello".to_vec(), 10, false);
        assert_eq!(chunk.len(), 5);
        assert_eq!(chunk.as_bytes(), b"hello");
    }

    #[test]
    fn test_valid_prefix_only() {
        let chunk = Chunk::new(b"hello world".to_vec(), 5, true);
        assert_eq!(chunk.as_bytes(), b"hello");
        assert!(chunk.is_last());
    }

    #[test]
    fn test_empty() {
        let chunk = Chunk::empty();
        assert!(chunk.is_empty());
        assert!(!chunk.is_last());
    }

    #[test]
    fn test_use_count_tracks_handles() {
        let chunk = Chunk::from_vec(b"abc".to_vec(), false);
        let second = chunk.clone();
        assert_eq!(chunk.use_count(), 2);
        drop(second);
        assert_eq!(chunk.use_count(), 1);
    }

    #[test]
    fn test_on_free_fires_once() {
        let freed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&freed);
        let chunk = Chunk::with_on_free(b"abc".to_vec(), 3, false, move |buf| {
            assert_eq!(buf, b"abc");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..4).map(|_| chunk.clone()).collect();
        drop(chunk);
        assert_eq!(freed.load(Ordering::SeqCst), 0);
        drop(handles);
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pooled_returns_buffer() {
        let pool = Arc::new(BufferPool::new(8));
        let buf = pool.acquire();
        let chunk = Chunk::pooled(buf, 3, false, Arc::clone(&pool));
        assert_eq!(pool.available(), 0);
        drop(chunk);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_display() {
        let chunk = Chunk::from_vec(b"hello".to_vec(), true);
        let s = format!("{}", chunk);
        assert!(s.contains("5 bytes"));
        assert!(s.contains("last"));
    }
}
