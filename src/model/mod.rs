//! # Vertex Model
//!
//! Plain data: the vertex, its handle, its lock state and edge weights.
//! These types cross every boundary between the arena and its callers.
//!
//! Design rule: nothing here touches a second vertex. A vertex only ever
//! edits its own adjacency; pairing both sides of an edge lives in `storage`.

pub mod vertex;

pub use vertex::{Vertex, VertexId, LockState, Weight, DEFAULT_WEIGHT};
