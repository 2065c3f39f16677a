//! Chunk sources.
//!
//! A [`ChunkSource`] is the pull interface the splitter reads from. The
//! crate ships an adapter for any [`std::io::Read`] and one for plain
//! iterators of chunks; anything else (sockets, HTTP bodies, memory maps)
//! plugs in by implementing the trait.

use std::io::{self, Read};
use std::sync::Arc;

use tracing::trace;

use super::Chunk;
use crate::buffer::BufferPool;

/// Serial source of raw input chunks.
///
/// Each call returns the next chunk in source order. The final chunk is
/// flagged with [`Chunk::is_last`]; it may be empty. Errors are propagated
/// unchanged to the caller of the parse.
pub trait ChunkSource {
    /// Pulls the next chunk.
    fn next_chunk(&mut self) -> io::Result<Chunk>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    fn next_chunk(&mut self) -> io::Result<Chunk> {
        (**self).next_chunk()
    }
}

/// Reads pooled chunks from a [`Read`] implementation.
///
/// Every chunk fills a whole pooled buffer; short reads are retried so that a
/// chunk is only marked last once the reader reports end of stream.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use std::sync::Arc;
/// use quickcsv::{BufferPool, ChunkSource, ReaderSource};
///
/// let pool = Arc::new(BufferPool::new(4));
/// let mut source = ReaderSource::new(Cursor::new(b"abcdef".to_vec()), pool);
///
/// let first = source.next_chunk()?;
/// assert_eq!(first.as_bytes(), b"abcd");
/// assert!(!first.is_last());
///
/// let second = source.next_chunk()?;
/// assert_eq!(second.as_bytes(), b"ef");
/// assert!(second.is_last());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    pool: Arc<BufferPool>,
    offset: u64,
}

impl<R: Read> ReaderSource<R> {
    /// Creates a source reading into buffers taken from `pool`.
    pub fn new(reader: R, pool: Arc<BufferPool>) -> Self {
        Self {
            reader,
            pool,
            offset: 0,
        }
    }

    /// Bytes read so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Consumes the source and returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> io::Result<Chunk> {
        let mut buf = self.pool.acquire();
        let filled = match self.fill(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.pool.release(buf);
                return Err(e);
            }
        };
        let last = filled < buf.len();
        trace!(offset = self.offset, len = filled, last, "read chunk");
        self.offset += filled as u64;
        Ok(Chunk::pooled(buf, filled, last, Arc::clone(&self.pool)))
    }
}

/// Adapts an iterator of chunks into a [`ChunkSource`].
///
/// When the iterator runs out without having produced a chunk flagged last,
/// an empty last chunk is returned.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = io::Result<Chunk>>,
{
    /// Wraps `iter`.
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator<Item = io::Result<Chunk>>,
{
    fn next_chunk(&mut self) -> io::Result<Chunk> {
        match self.iter.next() {
            Some(chunk) => chunk,
            None => Ok(Chunk::new(Vec::new(), 0, true)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that returns at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_exact_multiple_ends_with_empty_last() {
        let pool = Arc::new(BufferPool::new(3));
        let mut source = ReaderSource::new(Cursor::new(b"abcdef".to_vec()), pool);

        let a = source.next_chunk().unwrap();
        let b = source.next_chunk().unwrap();
        let c = source.next_chunk().unwrap();
        assert_eq!(a.as_bytes(), b"abc");
        assert_eq!(b.as_bytes(), b"def");
        assert!(!b.is_last());
        assert!(c.is_empty());
        assert!(c.is_last());
        assert_eq!(source.offset(), 6);
    }

    #[test]
    fn test_short_reads_are_retried() {
        let pool = Arc::new(BufferPool::new(8));
        let reader = Trickle {
            data: b"0123456789",
            step: 3,
        };
        let mut source = ReaderSource::new(reader, pool);
        let first = source.next_chunk().unwrap();
        assert_eq!(first.as_bytes(), b"01234567");
        assert!(!first.is_last());
        let second = source.next_chunk().unwrap();
        assert_eq!(second.as_bytes(), b"89");
        assert!(second.is_last());
    }

    #[test]
    fn test_error_returns_buffer() {
        let pool = Arc::new(BufferPool::new(8));
        let mut source = ReaderSource::new(Failing, Arc::clone(&pool));
        assert!(source.next_chunk().is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_iter_source_appends_last() {
        let chunks = vec![Ok(Chunk::from_vec(b"a\n".to_vec(), false))];
        let mut source = IterSource::new(chunks.into_iter());
        assert_eq!(source.next_chunk().unwrap().as_bytes(), b"a\n");
        assert!(source.next_chunk().unwrap().is_last());
    }
}
