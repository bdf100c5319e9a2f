//! Pending collection requests, oldest trigger first
//!
//! Requests are kept in a `SortedVec` keyed by trigger hour and insertion
//! sequence, with a side index from station to its request so membership
//! checks and removals never rescan the queue.

use sorted_vec::SortedVec;
use std::collections::HashMap;

use super::types::StationId;

/// An outstanding request to service a station
///
/// Field order matters: the derived ordering is trigger hour, then the order
/// in which requests were raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollectionRequest {
    pub triggered_at: u32,
    seq: u64,
    pub station: StationId,
}

#[derive(Debug)]
pub struct RequestQueue {
    ordered: SortedVec<CollectionRequest>,
    by_station: HashMap<StationId, CollectionRequest>,
    next_seq: u64,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self {
            ordered: SortedVec::new(),
            by_station: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Queue a request for `station` unless one is already outstanding.
    /// Returns true if a new request was created.
    pub fn insert_if_absent(&mut self, station: StationId, hour: u32) -> bool {
        if self.by_station.contains_key(&station) {
            return false;
        }

        let request = CollectionRequest {
            triggered_at: hour,
            seq: self.next_seq,
            station,
        };
        self.next_seq += 1;
        self.ordered.insert(request);
        self.by_station.insert(station, request);
        true
    }

    /// Drop the outstanding request for `station`, if any
    pub fn remove(&mut self, station: StationId) -> Option<CollectionRequest> {
        let request = self.by_station.remove(&station)?;
        self.ordered.remove_item(&request)
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.by_station.contains_key(&station)
    }

    pub fn get(&self, station: StationId) -> Option<&CollectionRequest> {
        self.by_station.get(&station)
    }

    /// Requests in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &CollectionRequest> {
        self.ordered.iter()
    }

    /// Copy of the queue in dispatch order, safe to hold while mutating the queue
    pub fn snapshot(&self) -> Vec<CollectionRequest> {
        self.ordered.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
