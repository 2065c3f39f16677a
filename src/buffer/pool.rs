//! Shared pool of fixed-size read buffers.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;
use tracing::debug;

/// Default buffer size for pooled buffers (512 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 512 * 1024;

/// Number of buffers the pool keeps regardless of past concurrency.
pub const DEFAULT_RETAIN_LIMIT: usize = 4;

/// A lock-free freelist of equally sized byte buffers.
///
/// `acquire` hands out a pooled buffer or allocates a new one when the
/// freelist is empty. The pool counts how many buffers it has created since
/// the last reset; when every one of them has come back and that count is
/// above the retain limit, the freelist is dropped so a burst of parallel
/// work does not pin memory for the rest of the parse.
///
/// The accounting is approximate under contention. It never blocks.
#[derive(Debug)]
pub struct BufferPool {
    buffer_size: usize,
    retain_limit: usize,
    buffers: SegQueue<Vec<u8>>,
    pooled: AtomicUsize,
    created: AtomicUsize,
}

impl BufferPool {
    /// Creates a pool handing out buffers of `buffer_size` bytes.
    pub fn new(buffer_size: usize) -> Self {
        Self::with_retain_limit(buffer_size, DEFAULT_RETAIN_LIMIT)
    }

    /// Creates a pool with an explicit retain limit.
    pub fn with_retain_limit(buffer_size: usize, retain_limit: usize) -> Self {
        Self {
            buffer_size,
            retain_limit,
            buffers: SegQueue::new(),
            pooled: AtomicUsize::new(0),
            created: AtomicUsize::new(0),
        }
    }

    /// Size in bytes of every buffer handed out by this pool.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Takes a buffer from the pool, allocating only when none is free.
    ///
    /// The returned buffer always has length `buffer_size`; its content is
    /// whatever the previous user left in it.
    pub fn acquire(&self) -> Vec<u8> {
        match self.buffers.pop() {
            Some(buf) => {
                self.pooled.fetch_sub(1, Ordering::AcqRel);
                buf
            }
            None => {
                self.created.fetch_add(1, Ordering::AcqRel);
                vec![0u8; self.buffer_size]
            }
        }
    }

    /// Returns a buffer for reuse.
    ///
    /// Buffers of a foreign size are dropped.
    pub fn release(&self, buf: Vec<u8>) {
        if buf.len() != self.buffer_size {
            return;
        }
        self.buffers.push(buf);
        let pooled = self.pooled.fetch_add(1, Ordering::AcqRel) + 1;
        let high_water = self.created.load(Ordering::Acquire);
        if pooled >= high_water && high_water > self.retain_limit {
            self.reset(high_water);
        }
    }

    /// Number of buffers currently waiting in the freelist.
    pub fn available(&self) -> usize {
        self.pooled.load(Ordering::Acquire)
    }

    /// Number of buffers allocated since the last reset.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// Drops every pooled buffer.
    ///
    /// Dropped buffers no longer count as created, so buffers still in use
    /// keep the high-water reset working.
    pub fn clear(&self) {
        let dropped = self.drain();
        debug!(dropped, "buffer pool cleared");
    }

    fn reset(&self, high_water: usize) {
        let dropped = self.drain();
        debug!(dropped, high_water, "buffer pool reset");
    }

    /// Pops every pooled buffer and forgets it. Returns how many were dropped.
    fn drain(&self) -> usize {
        let mut dropped = 0usize;
        while self.buffers.pop().is_some() {
            self.pooled.fetch_sub(1, Ordering::AcqRel);
            dropped += 1;
        }
        let _ = self
            .created
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(dropped))
            });
        dropped
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_allocates_full_size() {
        let pool = BufferPool::new(64);
        let buf = pool.acquire();
        assert_eq!(buf.len(), 64);
        assert_eq!(pool.created(), 1);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_buffer_reuse() {
        let pool = BufferPool::new(16);
        let mut buf = pool.acquire();
        buf[0] = 42;
        pool.release(buf);
        assert_eq!(pool.available(), 1);

        let again = pool.acquire();
        assert_eq!(again[0], 42, "pooled buffer should be handed out again");
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_foreign_buffer_is_dropped() {
        let pool = BufferPool::new(16);
        pool.release(vec![0u8; 8]);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_reset_after_spike() {
        let pool = BufferPool::with_retain_limit(8, 2);
        let bufs: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.created(), 5);

        for buf in bufs {
            pool.release(buf);
        }
        // Every buffer came back and the spike exceeded the retain limit.
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.created(), 0);
    }

    #[test]
    fn test_small_pool_is_retained() {
        let pool = BufferPool::with_retain_limit(8, 4);
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_clear() {
        let pool = BufferPool::new(8);
        pool.release(pool.acquire());
        pool.clear();
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.created(), 0);
    }

    #[test]
    fn test_reset_after_clear() {
        let pool = BufferPool::with_retain_limit(8, 2);
        pool.release(pool.acquire());
        pool.clear();

        let bufs: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.created(), 5);
        for buf in bufs {
            pool.release(buf);
        }
        assert_eq!(pool.available(), 0, "spike after clear should still reset");
        assert_eq!(pool.created(), 0);
    }

    #[test]
    fn test_clear_with_buffers_in_use() {
        let pool = BufferPool::with_retain_limit(8, 2);
        let held: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
        pool.release(pool.acquire());
        pool.clear();
        assert_eq!(pool.created(), 3);

        for buf in held {
            pool.release(buf);
        }
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.created(), 0);
    }
}
