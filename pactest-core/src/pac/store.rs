use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

use super::{Pac, ShortPac};
use crate::error::{PacError, Result};

/// Capacity used when the configuration does not name one.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded in-memory store of submitted PACs, keyed by uid.
///
/// Entries are kept in insertion order. Storing a uid that already exists
/// replaces the old record and moves it to the back of the queue; once the
/// store grows past its capacity the oldest entry is dropped. Reads never
/// change the order, so eviction is FIFO rather than LRU.
///
/// A single mutex guards the whole queue, which keeps `has`/`get`/`list`
/// consistent with each other and with concurrent `put`s.
#[derive(Debug)]
pub struct PacStore {
    capacity: usize,
    entries: Mutex<VecDeque<Pac>>,
}

impl Default for PacStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PacStore {
    /// Creates an empty store. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Stores a PAC, replacing any record with the same uid.
    pub fn put(&self, pac: Pac) {
        let mut entries = self.entries.lock();

        if let Some(position) = entries.iter().position(|existing| existing.uid == pac.uid) {
            entries.remove(position);
        }
        entries.push_back(pac);

        while entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_front() {
                debug!(uid = %evicted.uid, capacity = self.capacity, "evicted oldest PAC from store");
            }
        }
    }

    /// Returns a copy of the stored PAC.
    ///
    /// Fails with [`PacError::NotFound`] when the uid was never stored or has
    /// since been evicted.
    pub fn get(&self, uid: &str) -> Result<Pac> {
        self.entries
            .lock()
            .iter()
            .find(|pac| pac.uid.as_str() == uid)
            .cloned()
            .ok_or_else(|| PacError::NotFound(format!("PAC with UID {uid} not found")))
    }

    pub fn has(&self, uid: &str) -> bool {
        self.entries.lock().iter().any(|pac| pac.uid.as_str() == uid)
    }

    /// Lists stored PACs without content, oldest first.
    pub fn list(&self) -> Vec<ShortPac> {
        self.entries.lock().iter().map(Pac::short).collect()
    }
}
