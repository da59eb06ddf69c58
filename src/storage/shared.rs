//! Thread-shareable arena handle.
//!
//! One `RwLock` guards the whole arena, so a connection change touching two
//! vertices is atomic to every other holder and no lock ordering is needed.

use std::sync::Arc;
use parking_lot::RwLock;

use super::VertexArena;

/// Cloneable handle to an arena behind a single reader-writer lock.
#[derive(Debug)]
pub struct SharedArena<K, V = K> {
    inner: Arc<RwLock<VertexArena<K, V>>>,
}

impl<K, V> Clone for SharedArena<K, V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<K, V> Default for SharedArena<K, V> {
    fn default() -> Self {
        Self::new(VertexArena::new())
    }
}

impl<K, V> From<VertexArena<K, V>> for SharedArena<K, V> {
    fn from(arena: VertexArena<K, V>) -> Self {
        Self::new(arena)
    }
}

impl<K, V> SharedArena<K, V> {
    pub fn new(arena: VertexArena<K, V>) -> Self {
        Self { inner: Arc::new(RwLock::new(arena)) }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&VertexArena<K, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock. The lock is held for the whole closure.
    pub fn write<R>(&self, f: impl FnOnce(&mut VertexArena<K, V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Take the arena back once this is the last handle.
    pub fn try_into_inner(self) -> Result<VertexArena<K, V>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
