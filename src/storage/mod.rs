//! # Vertex Storage
//!
//! Vertices reference each other by [`VertexId`] handle only. The arena owns
//! every vertex, hands out the handles and is the single place where both
//! halves of an edge are written together.
//!
//! ## Containers
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `VertexArena` | `arena` | Owning container, single-threaded |
//! | `SharedArena` | `shared` | `Arc<RwLock<VertexArena>>` for sharing across threads |

pub mod arena;
pub mod shared;

use crate::model::{Weight, DEFAULT_WEIGHT};

pub use arena::VertexArena;
pub use shared::SharedArena;

// ============================================================================
// Arena Configuration
// ============================================================================

/// Configuration for a [`VertexArena`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaConfig {
    /// Slots reserved up front.
    pub initial_capacity: usize,
    /// Reject a second vertex with an equal key.
    pub unique_keys: bool,
    /// Weight used by `connect` / `disconnect`.
    pub default_weight: Weight,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            unique_keys: false,
            default_weight: DEFAULT_WEIGHT,
        }
    }
}

impl ArenaConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_unique_keys(mut self, unique: bool) -> Self {
        self.unique_keys = unique;
        self
    }

    pub fn with_default_weight(mut self, weight: Weight) -> Self {
        self.default_weight = weight;
        self
    }
}
