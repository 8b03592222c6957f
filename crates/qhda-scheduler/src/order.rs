//! Pending order model and batch validation

use crate::error::{SchedulerError, SchedulerResult};
use crate::resource_key::ResourceKey;
use crate::rw_set::RWSet;
use std::collections::HashSet;

/// A pending order with its declared resource footprint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// Identifier, unique within a batch
    pub id: String,
    /// Classification tag (e.g. "swap")
    pub kind: Option<String>,
    /// Trading pair label
    pub pair: Option<String>,
    /// Originating account
    pub account: Option<String>,
    /// Declared reads and writes
    pub rw_set: RWSet,
}

impl Order {
    /// Create an order with an empty footprint
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            pair: None,
            account: None,
            rw_set: RWSet::new(),
        }
    }

    /// Set the classification tag
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the trading pair label
    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    /// Set the originating account
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Declare a read
    pub fn reading(mut self, key: impl Into<ResourceKey>) -> Self {
        self.rw_set.record_read(key);
        self
    }

    /// Declare a write
    pub fn writing(mut self, key: impl Into<ResourceKey>) -> Self {
        self.rw_set.record_write(key);
        self
    }

    /// Conflict predicate between two orders
    pub fn conflicts_with(&self, other: &Order) -> bool {
        self.rw_set.conflicts_with(&other.rw_set)
    }

    fn validate_keys(&self, max_key_len: usize) -> SchedulerResult<()> {
        let mut keys: Vec<&ResourceKey> = self.rw_set.touched().collect();
        keys.sort();
        for key in keys {
            key.validate(max_key_len)
                .map_err(|reason| SchedulerError::MalformedResourceKey {
                    order: self.id.clone(),
                    key: key.as_str().to_string(),
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Validate a batch before any graph work
///
/// Identifiers must be non-blank and unique; every resource key must pass
/// [`ResourceKey::validate`]. The first problem in batch order is reported.
pub fn validate_batch(orders: &[Order], max_key_len: usize) -> SchedulerResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(orders.len());
    for (index, order) in orders.iter().enumerate() {
        if order.id.trim().is_empty() {
            return Err(SchedulerError::EmptyOrderId(index));
        }
        if !seen.insert(order.id.as_str()) {
            return Err(SchedulerError::DuplicateOrderId(order.id.clone()));
        }
        order.validate_keys(max_key_len)?;
    }
    Ok(())
}
