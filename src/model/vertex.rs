//! Vertex in the directed, weighted graph.
//!
//! A vertex records its own outgoing edges (with weights) and the handles of
//! vertices that point at it. It never reaches into another vertex: keeping
//! both sides of an edge in step is the job of [`VertexArena`], which owns
//! every vertex and is the only place connectivity changes.
//!
//! [`VertexArena`]: crate::storage::VertexArena

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

/// Edge weight carried by an outgoing connection.
pub type Weight = f64;

/// Weight used when a connection is made without an explicit one.
pub const DEFAULT_WEIGHT: Weight = 1.0;

new_key_type! {
    /// Opaque vertex handle, issued by the arena.
    ///
    /// Generational: a freed slot is reused under a new version, so a handle
    /// to a removed vertex never resolves to its successor.
    pub struct VertexId;
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.0)
    }
}

/// Whether a vertex's connectivity may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LockState {
    /// Connectivity frozen. Every vertex starts here.
    #[default]
    Locked,
    Unlocked,
}

/// A vertex: key, payload, lock flag and both halves of its adjacency.
#[derive(Debug, Clone)]
pub struct Vertex<K, V = K> {
    id: VertexId,
    key: K,
    value: V,
    state: LockState,
    /// target → weight, in insertion order
    outgoing: IndexMap<VertexId, Weight>,
    /// sources holding an outgoing edge to this vertex, in insertion order
    incoming: IndexSet<VertexId>,
}

impl<K, V> Vertex<K, V> {
    pub(crate) fn new(id: VertexId, key: K, value: V) -> Self {
        Self {
            id,
            key,
            value,
            state: LockState::Locked,
            outgoing: IndexMap::new(),
            incoming: IndexSet::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// The payload is not connectivity, so it stays editable while locked.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    // ========================================================================
    // Lock state
    // ========================================================================

    pub fn lock(&mut self) {
        self.state = LockState::Locked;
    }

    pub fn unlock(&mut self) {
        self.state = LockState::Unlocked;
    }

    pub fn lock_state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn contains_connection_to(&self, other: VertexId) -> bool {
        self.outgoing.contains_key(&other)
    }

    pub fn contains_connection_from(&self, other: VertexId) -> bool {
        self.incoming.contains(&other)
    }

    /// Weight of the edge to `other`, if there is one.
    pub fn weight_to(&self, other: VertexId) -> Option<Weight> {
        self.outgoing.get(&other).copied()
    }

    /// Targets of outgoing edges, oldest first.
    pub fn outgoing_vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        self.outgoing.keys().copied()
    }

    /// Sources of incoming edges, oldest first.
    pub fn incoming_vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        self.incoming.iter().copied()
    }

    /// Outgoing edges with their weights, oldest first.
    pub fn outgoing_edges(&self) -> impl ExactSizeIterator<Item = (VertexId, Weight)> + '_ {
        self.outgoing.iter().map(|(id, w)| (*id, *w))
    }

    /// True when there are no outgoing edges. Incoming edges are not counted.
    pub fn is_isolated(&self) -> bool {
        self.outgoing.is_empty()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    // ========================================================================
    // One-sided edits (arena only)
    // ========================================================================

    /// Record an outgoing edge. An existing edge keeps its weight.
    pub(crate) fn link_to(&mut self, target: VertexId, weight: Weight) -> bool {
        match self.outgoing.entry(target) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(weight);
                true
            }
        }
    }

    pub(crate) fn link_from(&mut self, source: VertexId) -> bool {
        self.incoming.insert(source)
    }

    pub(crate) fn unlink_to(&mut self, target: VertexId) -> bool {
        self.outgoing.shift_remove(&target).is_some()
    }

    pub(crate) fn unlink_from(&mut self, source: VertexId) -> bool {
        self.incoming.shift_remove(&source)
    }
}

impl<K: fmt::Display, V> fmt::Display for Vertex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
