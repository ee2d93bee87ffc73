//! RAII guard rejecting duplicate concurrent operations.

use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

/// Set of operation keys currently running.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<DashMap<String, ()>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`. Returns `None` while another guard for the same key is alive.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        match self.active.entry(key.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(InFlightGuard { active: Arc::clone(&self.active), key })
            },
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.contains_key(key)
    }
}

/// Releases its key on drop, including when the owning future is cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<DashMap<String, ()>>,
    key: String,
}

impl InFlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
