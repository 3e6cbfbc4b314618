//! Buffer pool: bounded set of resident pages with LRU eviction.
//!
//! The buffer pool keeps at most `capacity` pages in memory. A miss on a
//! full pool evicts the least recently used page, writing it back first
//! if it is dirty.

mod lru;
mod observer;
mod pool;

pub use observer::{PageEvent, PageObserver};
pub use pool::{BufferPool, PoolStats};

#[cfg(test)]
pub(crate) use observer::RecordingObserver;
