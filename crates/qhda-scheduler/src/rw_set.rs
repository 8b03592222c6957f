//! Read/Write set tracking for orders

use crate::resource_key::ResourceKey;
use std::collections::HashSet;

/// Read/Write set for an order
///
/// Declares which resources an order reads and writes.
/// Used for conflict detection between orders of one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RWSet {
    /// Resources that are read
    pub reads: HashSet<ResourceKey>,
    /// Resources that are written
    pub writes: HashSet<ResourceKey>,
}

impl RWSet {
    /// Create a new empty RW set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declared read and write lists, collapsing duplicates
    pub fn from_lists<R, W>(reads: R, writes: W) -> Self
    where
        R: IntoIterator,
        R::Item: Into<ResourceKey>,
        W: IntoIterator,
        W::Item: Into<ResourceKey>,
    {
        Self {
            reads: reads.into_iter().map(Into::into).collect(),
            writes: writes.into_iter().map(Into::into).collect(),
        }
    }

    /// Record a read access
    pub fn record_read(&mut self, key: impl Into<ResourceKey>) {
        self.reads.insert(key.into());
    }

    /// Record a write access
    pub fn record_write(&mut self, key: impl Into<ResourceKey>) {
        self.writes.insert(key.into());
    }

    /// Check if this order reads a key
    pub fn reads_key(&self, key: &ResourceKey) -> bool {
        self.reads.contains(key)
    }

    /// Check if this order writes a key
    pub fn writes_key(&self, key: &ResourceKey) -> bool {
        self.writes.contains(key)
    }

    /// Returns true if `self` reads a key that `other` writes.
    pub fn has_raw_dependency(&self, other: &RWSet) -> bool {
        self.reads.iter().any(|key| other.writes.contains(key))
    }

    /// Returns true if both orders write the same key.
    pub fn has_waw_conflict(&self, other: &RWSet) -> bool {
        self.writes.iter().any(|key| other.writes.contains(key))
    }

    /// Returns true if `self` writes a key that `other` reads.
    pub fn has_war_conflict(&self, other: &RWSet) -> bool {
        self.writes.iter().any(|key| other.reads.contains(key))
    }

    /// Symmetric conflict predicate
    ///
    /// Two orders conflict when they write a common key, or when one writes
    /// a key the other reads. Shared reads never conflict.
    pub fn conflicts_with(&self, other: &RWSet) -> bool {
        self.has_waw_conflict(other) || self.has_war_conflict(other) || self.has_raw_dependency(other)
    }

    /// Get all conflicting keys with another RW set
    pub fn get_conflicts(&self, other: &RWSet) -> ConflictSet {
        let raw: HashSet<_> = self.reads.intersection(&other.writes).cloned().collect();
        let waw: HashSet<_> = self.writes.intersection(&other.writes).cloned().collect();
        let war: HashSet<_> = self.writes.intersection(&other.reads).cloned().collect();

        ConflictSet { raw, waw, war }
    }

    /// Every key this order touches, read or written
    pub fn touched(&self) -> impl Iterator<Item = &ResourceKey> {
        self.writes
            .iter()
            .chain(self.reads.iter().filter(|key| !self.writes.contains(*key)))
    }

    /// Get number of read keys
    pub fn read_count(&self) -> usize {
        self.reads.len()
    }

    /// Get number of write keys
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Check if the RW set is empty
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty()
    }
}

/// Set of conflicting keys between two orders
#[derive(Clone, Debug, Default)]
pub struct ConflictSet {
    /// Keys the first order reads and the second writes
    pub raw: HashSet<ResourceKey>,
    /// Keys both orders write
    pub waw: HashSet<ResourceKey>,
    /// Keys the first order writes and the second reads
    pub war: HashSet<ResourceKey>,
}

impl ConflictSet {
    /// Check if there are any conflicts
    pub fn has_conflicts(&self) -> bool {
        !self.raw.is_empty() || !self.waw.is_empty() || !self.war.is_empty()
    }

    /// Get total number of conflicting keys
    pub fn total_conflicts(&self) -> usize {
        self.raw.len() + self.waw.len() + self.war.len()
    }
}
