//! # vertex-graph — Lockable Directed Weighted Vertices
//!
//! A vertex that knows its outgoing weighted edges and the vertices pointing
//! back at it, with a lock flag that freezes connectivity once finalized.
//!
//! ## Design Principles
//!
//! 1. **Handles, not pointers**: vertices live in a `VertexArena` and refer to
//!    each other by `VertexId`, so back-references never form ownership cycles
//! 2. **Paired edges**: `B ∈ A.outgoing ⟺ A ∈ B.incoming` after every
//!    successful mutation; only the arena writes connectivity
//! 3. **Two channels**: `Ok(false)` is an expected no-op, `Err` is a violated
//!    precondition (locked endpoint, unknown handle)
//!
//! ## Quick Start
//!
//! ```rust
//! use vertex_graph::{VertexArena, Error};
//!
//! # fn example() -> vertex_graph::Result<()> {
//! let mut arena: VertexArena<&str> = VertexArena::new();
//! let a = arena.insert("a")?;
//! let b = arena.insert("b")?;
//!
//! // New vertices start locked.
//! assert!(matches!(arena.connect(a, b), Err(Error::LockedVertex { .. })));
//!
//! arena.unlock(a)?;
//! arena.unlock(b)?;
//! assert!(arena.add_connection(a, b, 5.0)?);
//! assert!(!arena.add_connection(a, b, 7.0)?);
//!
//! let vb = arena.get(b).unwrap();
//! assert!(vb.contains_connection_from(a));
//! assert_eq!(vb.in_degree(), 1);
//! assert_eq!(vb.to_string(), "b");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{Vertex, VertexId, LockState, Weight, DEFAULT_WEIGHT};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{VertexArena, SharedArena, ArenaConfig};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Vertex {vertex} is locked")]
    LockedVertex { vertex: VertexId },

    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexId),

    #[error("Duplicate vertex key, already held by {existing}")]
    DuplicateKey { existing: VertexId },

    #[error("Unpaired edge {from} -> {to}")]
    BrokenInvariant { from: VertexId, to: VertexId },
}

pub type Result<T> = std::result::Result<T, Error>;
