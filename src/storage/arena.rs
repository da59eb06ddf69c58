//! Owning vertex arena.
//!
//! This is the reference container for [`Vertex`]. Vertices live in a
//! [`SlotMap`] and reference each other by [`VertexId`], so the
//! outgoing/incoming pairs never form an ownership cycle.
//!
//! ## Guarantees
//!
//! - **Paired edges**: `add_connection` writes the outgoing entry and the
//!   back-reference in one call, after every precondition has been checked.
//!   An error leaves both vertices untouched.
//! - **Lock gating**: any connectivity change needs both endpoints unlocked.
//!   Reads work in either state.
//! - **Bounded storage**: a removed vertex's slot is reused by the next insert.
//!   The reused slot carries a new version, so a stale `VertexId` yields
//!   `VertexNotFound` instead of the successor.
//!
//! ## Limitations
//!
//! - `remove_connection` removes each side independently. If the pair was
//!   already asymmetric the present side is removed and `false` comes back.
//! - Iteration follows slot order, which stops matching insertion order once
//!   slots are reused.
//! - Keys need `Hash + Eq` only for arenas built with `unique_keys`; the key
//!   index stores handles bucketed by key hash, never keys.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use hashbrown::{DefaultHashBuilder, HashMap};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::model::*;
use crate::{Error, Result};
use super::ArenaConfig;

// ============================================================================
// KeyIndex
// ============================================================================

/// key hash → handles, for arenas with `unique_keys`.
///
/// Hashing and equality are captured as fn pointers when the index is built,
/// so the arena itself puts no bounds on `K`.
struct KeyIndex<K> {
    state: DefaultHashBuilder,
    buckets: HashMap<u64, SmallVec<[VertexId; 1]>>,
    hash: fn(&DefaultHashBuilder, &K) -> u64,
    eq: fn(&K, &K) -> bool,
}

impl<K> Clone for KeyIndex<K> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            buckets: self.buckets.clone(),
            hash: self.hash,
            eq: self.eq,
        }
    }
}

impl<K> fmt::Debug for KeyIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIndex").field("buckets", &self.buckets).finish()
    }
}

impl<K> KeyIndex<K> {
    fn new() -> Self
    where
        K: Eq + Hash,
    {
        Self {
            state: DefaultHashBuilder::default(),
            buckets: HashMap::new(),
            hash: |state: &DefaultHashBuilder, key: &K| state.hash_one(key),
            eq: |a: &K, b: &K| a == b,
        }
    }

    fn bucket(&self, key: &K) -> u64 {
        (self.hash)(&self.state, key)
    }

    fn find<V>(&self, key: &K, vertices: &SlotMap<VertexId, Vertex<K, V>>) -> Option<VertexId> {
        self.buckets
            .get(&self.bucket(key))?
            .iter()
            .copied()
            .find(|id| vertices.get(*id).is_some_and(|v| (self.eq)(v.key(), key)))
    }

    fn claim(&mut self, bucket: u64, id: VertexId) {
        self.buckets.entry(bucket).or_default().push(id);
    }

    fn release(&mut self, key: &K, id: VertexId) {
        let bucket = self.bucket(key);
        if let Some(ids) = self.buckets.get_mut(&bucket) {
            ids.retain(|held| *held != id);
            if ids.is_empty() {
                self.buckets.remove(&bucket);
            }
        }
    }
}

// ============================================================================
// VertexArena
// ============================================================================

/// Owns vertices and keeps both halves of every edge in step.
#[derive(Debug, Clone)]
pub struct VertexArena<K, V = K> {
    vertices: SlotMap<VertexId, Vertex<K, V>>,
    key_index: Option<KeyIndex<K>>,
    config: ArenaConfig,
}

impl<K, V> Default for VertexArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> VertexArena<K, V> {
    /// Empty arena with the default configuration (no key index).
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: SlotMap::with_capacity_and_key(capacity),
            key_index: None,
            config: ArenaConfig::default().with_capacity(capacity),
        }
    }

    /// Arena from an explicit configuration. `unique_keys` builds the key
    /// index, which is why this constructor needs `K: Eq + Hash`.
    pub fn with_config(config: ArenaConfig) -> Self
    where
        K: Eq + Hash,
    {
        Self {
            vertices: SlotMap::with_capacity_and_key(config.initial_capacity),
            key_index: config.unique_keys.then(KeyIndex::new),
            config,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Number of live vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex<K, V>> {
        self.vertices.get(id)
    }

    /// Live vertices in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex<K, V>> + '_ {
        self.vertices.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    /// Total number of directed edges, self-loops included.
    pub fn edge_count(&self) -> usize {
        self.iter().map(Vertex::out_degree).sum()
    }

    fn slot(&self, id: VertexId) -> Result<&Vertex<K, V>> {
        self.vertices.get(id).ok_or(Error::VertexNotFound(id))
    }

    fn slot_mut(&mut self, id: VertexId) -> Result<&mut Vertex<K, V>> {
        self.vertices.get_mut(id).ok_or(Error::VertexNotFound(id))
    }

    // ========================================================================
    // Vertex CRUD
    // ========================================================================

    /// Insert a vertex whose value is a copy of its key.
    pub fn insert(&mut self, key: K) -> Result<VertexId>
    where
        K: Clone,
        V: From<K>,
    {
        let value = V::from(key.clone());
        self.insert_with_value(key, value)
    }

    /// Insert a locked vertex with an explicit value.
    ///
    /// Fails only on an arena with `unique_keys` that already holds `key`.
    pub fn insert_with_value(&mut self, key: K, value: V) -> Result<VertexId> {
        let bucket = match &self.key_index {
            Some(index) => {
                if let Some(existing) = index.find(&key, &self.vertices) {
                    return Err(Error::DuplicateKey { existing });
                }
                Some(index.bucket(&key))
            }
            None => None,
        };

        let id = self.vertices.insert_with_key(|id| Vertex::new(id, key, value));
        if let (Some(index), Some(bucket)) = (&mut self.key_index, bucket) {
            index.claim(bucket, id);
        }

        trace!(%id, "vertex inserted");
        Ok(id)
    }

    /// Detach a vertex from all its neighbours and take it out of the arena.
    ///
    /// The vertex and every neighbour must be unlocked, since each of them
    /// loses an edge. Only the key and value come back: the handle is dead
    /// once this returns, and its slot goes to the next insert.
    pub fn remove(&mut self, id: VertexId) -> Result<(K, V)> {
        let vertex = self.slot(id)?;
        if vertex.is_locked() {
            return Err(Error::LockedVertex { vertex: id });
        }

        let mut neighbours: SmallVec<[VertexId; 8]> = vertex
            .outgoing_vertices()
            .chain(vertex.incoming_vertices())
            .filter(|n| *n != id)
            .collect();
        neighbours.sort_unstable();
        neighbours.dedup();
        if let Some(locked) = neighbours
            .iter()
            .copied()
            .find(|n| self.get(*n).is_some_and(Vertex::is_locked))
        {
            return Err(Error::LockedVertex { vertex: locked });
        }

        let vertex = self.vertices.remove(id).ok_or(Error::VertexNotFound(id))?;
        for target in vertex.outgoing_vertices() {
            if let Some(t) = self.vertices.get_mut(target) {
                t.unlink_from(id);
            }
        }
        for source in vertex.incoming_vertices() {
            if let Some(s) = self.vertices.get_mut(source) {
                s.unlink_to(id);
            }
        }
        if let Some(index) = &mut self.key_index {
            index.release(vertex.key(), id);
        }

        debug!(
            %id,
            out_degree = vertex.out_degree(),
            in_degree = vertex.in_degree(),
            neighbours = neighbours.len(),
            "vertex removed"
        );
        Ok(vertex.into_parts())
    }

    // ========================================================================
    // Lock state and payload
    // ========================================================================

    pub fn lock(&mut self, id: VertexId) -> Result<()> {
        self.slot_mut(id)?.lock();
        Ok(())
    }

    pub fn unlock(&mut self, id: VertexId) -> Result<()> {
        self.slot_mut(id)?.unlock();
        Ok(())
    }

    pub fn lock_all(&mut self) {
        self.vertices.values_mut().for_each(Vertex::lock);
    }

    pub fn unlock_all(&mut self) {
        self.vertices.values_mut().for_each(Vertex::unlock);
    }

    /// Payload access. Allowed whatever the lock state.
    pub fn value_mut(&mut self, id: VertexId) -> Result<&mut V> {
        Ok(self.slot_mut(id)?.value_mut())
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Both endpoints must exist and be unlocked.
    fn ensure_unlocked(&self, from: VertexId, to: VertexId) -> Result<()> {
        let endpoints = [self.slot(from)?, self.slot(to)?];
        match endpoints.iter().find(|v| v.is_locked()) {
            Some(locked) => Err(Error::LockedVertex { vertex: locked.id() }),
            None => Ok(()),
        }
    }

    /// Add the edge `from → to`.
    ///
    /// Returns `Ok(false)` without touching anything when the edge already
    /// exists; the stored weight is kept. Self-loops are allowed.
    pub fn add_connection(&mut self, from: VertexId, to: VertexId, weight: Weight) -> Result<bool> {
        self.ensure_unlocked(from, to)?;

        if self.slot(from)?.contains_connection_to(to) {
            trace!(%from, %to, "connection already present");
            return Ok(false);
        }

        self.slot_mut(from)?.link_to(to, weight);
        self.slot_mut(to)?.link_from(from);

        debug!(%from, %to, weight, "connection added");
        Ok(true)
    }

    /// [`add_connection`](Self::add_connection) with the configured default weight.
    pub fn connect(&mut self, from: VertexId, to: VertexId) -> Result<bool> {
        self.add_connection(from, to, self.config.default_weight)
    }

    /// Remove the edge `from → to`.
    ///
    /// `_weight` does not select anything: there is at most one edge per
    /// ordered pair. Both sides are removed independently and `true` is
    /// returned only when both were present.
    pub fn remove_connection(&mut self, from: VertexId, to: VertexId, _weight: Weight) -> Result<bool> {
        self.ensure_unlocked(from, to)?;

        let dropped_out = self.slot_mut(from)?.unlink_to(to);
        let dropped_in = self.slot_mut(to)?.unlink_from(from);

        match (dropped_out, dropped_in) {
            (true, true) => debug!(%from, %to, "connection removed"),
            (false, false) => trace!(%from, %to, "no connection to remove"),
            _ => warn!(%from, %to, dropped_out, dropped_in, "removed one-sided connection"),
        }

        Ok(dropped_out && dropped_in)
    }

    /// [`remove_connection`](Self::remove_connection) with the configured default weight.
    pub fn disconnect(&mut self, from: VertexId, to: VertexId) -> Result<bool> {
        self.remove_connection(from, to, self.config.default_weight)
    }

    /// Verify that every outgoing entry has its back-reference and vice versa.
    pub fn check_invariant(&self) -> Result<()> {
        for vertex in self.iter() {
            let id = vertex.id();
            for to in vertex.outgoing_vertices() {
                if !self.get(to).is_some_and(|t| t.contains_connection_from(id)) {
                    return Err(Error::BrokenInvariant { from: id, to });
                }
            }
            for from in vertex.incoming_vertices() {
                if !self.get(from).is_some_and(|s| s.contains_connection_to(id)) {
                    return Err(Error::BrokenInvariant { from, to: id });
                }
            }
        }
        Ok(())
    }
}

impl<K: PartialEq, V> VertexArena<K, V> {
    /// A live vertex with this key. Without `unique_keys` this is the first
    /// match in slot order.
    pub fn find(&self, key: &K) -> Option<VertexId> {
        match &self.key_index {
            Some(index) => index.find(key, &self.vertices),
            None => self.iter().find(|v| v.key() == key).map(Vertex::id),
        }
    }
}
