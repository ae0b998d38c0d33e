//! Visited-address bookkeeping.

use crate::storage::{Storage, StorageResult};
use std::collections::HashSet;

/// The set of addresses that have already been collected or confirmed
/// empty.
///
/// Loaded once when the controller starts, from the storage backend's
/// authoritative record of saved races and no-event addresses. During a
/// run it is append-only and owned exclusively by the controller, which
/// consults it before every navigation decision and marks addresses only
/// after a unit completes.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
}

impl Frontier {
    /// Loads the frontier from storage: every address with a saved race
    /// record plus every address recorded as having no event.
    pub fn load<S: Storage>(storage: &S) -> StorageResult<Self> {
        let mut visited = storage.load_known_addresses()?;
        visited.extend(storage.load_no_event_addresses()?);
        tracing::info!("Loaded {} previously visited addresses", visited.len());
        Ok(Self { visited })
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
