//! Location-keyed collection of collectives.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use super::types::{Closer, Collective};
use crate::election::MakerChooser;
use crate::error::CollectiveError;
use crate::types::{LocationKey, Timestamp, UserId};

/// At most one collective per [`LocationKey`].
///
/// Closed collectives stay in the registry, so `State` and `Ping` keep
/// working, until a new `Init` at the same location replaces them. The only
/// exception is a collective drained by its last member leaving, which the
/// dispatcher evicts right away.
///
/// The registry is plain owned state with no interior locking: whoever owns
/// it must serialize access, as the dispatcher's single event loop does.
#[derive(Debug)]
pub struct CollectiveRegistry {
    collectives: HashMap<LocationKey, Collective>,
    capacity: usize,
    timeout: Duration,
}

impl CollectiveRegistry {
    /// Creates an empty registry whose collectives get `capacity` seats and
    /// time out after `timeout`.
    pub fn new(capacity: usize, timeout: Duration) -> Self {
        Self {
            collectives: HashMap::new(),
            capacity,
            timeout,
        }
    }

    /// Opens a collective led by `leader` at `key`.
    ///
    /// A closed collective at `key` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if an open collective already exists at `key`.
    pub fn try_init(
        &mut self,
        key: LocationKey,
        leader: UserId,
        now: Timestamp,
    ) -> Result<&mut Collective, CollectiveError> {
        if let Some(existing) = self.collectives.get(&key) {
            if !existing.is_closed() {
                return Err(CollectiveError::AlreadyOpen(key));
            }
            debug!(
                collective_id = %existing.id(),
                stream = %key.stream,
                topic = %key.topic,
                "Replacing closed collective"
            );
        }

        let collective = Collective::opened_at(leader, self.capacity, self.timeout, now);
        info!(
            collective_id = %collective.id(),
            stream = %key.stream,
            topic = %key.topic,
            leader = %collective.leader().map(UserId::as_str).unwrap_or_default(),
            capacity = self.capacity,
            "Collective opened"
        );

        match self.collectives.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.insert(collective);
                Ok(slot.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(collective)),
        }
    }

    /// Returns the collective at `key`, open or closed.
    pub fn get(&self, key: &LocationKey) -> Option<&Collective> {
        self.collectives.get(key)
    }

    /// Returns the collective at `key` for mutation.
    pub fn get_mut(&mut self, key: &LocationKey) -> Option<&mut Collective> {
        self.collectives.get_mut(key)
    }

    /// Removes and returns the collective at `key`.
    pub fn evict(&mut self, key: &LocationKey) -> Option<Collective> {
        let evicted = self.collectives.remove(key);
        if let Some(ref collective) = evicted {
            info!(
                collective_id = %collective.id(),
                stream = %key.stream,
                topic = %key.topic,
                "Collective evicted"
            );
        }
        evicted
    }

    /// Closes every open collective that has outlived its timeout.
    ///
    /// Returns the collectives closed by this sweep, ordered by location.
    /// Collectives that were already closed are left alone, so sweeping
    /// twice in a row closes nothing the second time.
    pub fn sweep_stale(
        &mut self,
        now: Timestamp,
        chooser: &mut dyn MakerChooser,
    ) -> Vec<(&LocationKey, &Collective)> {
        let mut stale: Vec<LocationKey> = self
            .collectives
            .iter()
            .filter(|(_, collective)| collective.is_stale(now))
            .map(|(key, _)| key.clone())
            .collect();
        stale.sort();

        let mut timed_out = Vec::with_capacity(stale.len());
        for key in stale {
            if let Some(collective) = self.collectives.get_mut(&key) {
                if collective.close(Closer::System, chooser).is_ok() {
                    info!(
                        collective_id = %collective.id(),
                        stream = %key.stream,
                        topic = %key.topic,
                        maker = %collective.maker().map(UserId::as_str).unwrap_or_default(),
                        "Collective timed out"
                    );
                    timed_out.push(key);
                }
            }
        }

        timed_out
            .into_iter()
            .filter_map(|key| self.collectives.get_key_value(&key))
            .collect()
    }

    /// Number of tracked collectives, open or closed.
    pub fn len(&self) -> usize {
        self.collectives.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.collectives.is_empty()
    }

    /// Number of collectives still open.
    pub fn open_count(&self) -> usize {
        self.collectives.values().filter(|c| !c.is_closed()).count()
    }

    /// Iterates over all tracked collectives in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&LocationKey, &Collective)> {
        self.collectives.iter()
    }
}
