//! Bounded storage for sessions that are expensive to rebuild.

mod lru;

pub use lru::{CacheStats, LruCache, DEFAULT_CAPACITY};
