//! The resolved set: memoization cache, visited set and final output in one.
//!
//! A coordinate key is claimed atomically before its descriptor is fetched,
//! so at most one fetch ever happens per coordinate and a claimed key is never
//! processed again.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::Descriptor;

/// Read access to descriptors that are already available.
pub trait DescriptorSource {
    fn descriptor(&self, coordinate: &Coordinate) -> Option<Arc<Descriptor>>;
}

impl DescriptorSource for HashMap<String, Arc<Descriptor>> {
    fn descriptor(&self, coordinate: &Coordinate) -> Option<Arc<Descriptor>> {
        self.get(&coordinate.to_text()).cloned()
    }
}

impl DescriptorSource for BTreeMap<String, Arc<Descriptor>> {
    fn descriptor(&self, coordinate: &Coordinate) -> Option<Arc<Descriptor>> {
        self.get(&coordinate.to_text()).cloned()
    }
}

/// State of one coordinate in the set.
#[derive(Debug, Clone)]
pub enum SlotState {
    /// Claimed; the descriptor is being fetched.
    Pending,
    Ready(Arc<Descriptor>),
    /// Fetching or parsing failed; the coordinate is not retried.
    Failed,
}

/// Result of [`ResolvedSet::claim`].
pub enum Claim<'a> {
    /// The caller inserted the key and must publish its outcome.
    Fresh(SlotGuard<'a>),
    /// Someone else already owns the key.
    Existing,
}

/// Write handle for a freshly claimed slot.
///
/// Dropping it without publishing marks the slot failed.
pub struct SlotGuard<'a> {
    set: &'a ResolvedSet,
    key: String,
}

impl SlotGuard<'_> {
    pub fn publish(self, descriptor: Arc<Descriptor>) {
        self.set.store(&self.key, SlotState::Ready(descriptor));
    }

    pub fn fail(self) {
        self.set.store(&self.key, SlotState::Failed);
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.set.slots();
        if let Some(state) = slots.get_mut(&self.key) {
            if matches!(state, SlotState::Pending) {
                *state = SlotState::Failed;
            }
        }
    }
}

/// Shared, mutex-guarded map from coordinate text to slot state.
#[derive(Default)]
pub struct ResolvedSet {
    slots: Mutex<HashMap<String, SlotState>>,
}

impl ResolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, SlotState>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, key: &str, state: SlotState) {
        self.slots().insert(key.to_string(), state);
    }

    /// Insert `key` if absent. Check and insert happen under one lock.
    pub fn claim(&self, key: &str) -> Claim<'_> {
        let mut slots = self.slots();
        if slots.contains_key(key) {
            return Claim::Existing;
        }
        slots.insert(key.to_string(), SlotState::Pending);
        Claim::Fresh(SlotGuard {
            set: self,
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots().contains_key(key)
    }

    pub fn state(&self, key: &str) -> Option<SlotState> {
        self.slots().get(key).cloned()
    }

    /// Snapshot of every successfully resolved descriptor, keyed by coordinate text.
    pub fn resolved(&self) -> BTreeMap<String, Arc<Descriptor>> {
        self.slots()
            .iter()
            .filter_map(|(key, state)| match state {
                SlotState::Ready(descriptor) => Some((key.clone(), Arc::clone(descriptor))),
                _ => None,
            })
            .collect()
    }
}

impl DescriptorSource for ResolvedSet {
    fn descriptor(&self, coordinate: &Coordinate) -> Option<Arc<Descriptor>> {
        match self.state(&coordinate.to_text())? {
            SlotState::Ready(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(text: &str) -> Arc<Descriptor> {
        Arc::new(Descriptor::new(Coordinate::parse(text).unwrap()))
    }

    #[test]
    fn claim_is_insert_if_absent() {
        let set = ResolvedSet::new();
        assert!(matches!(set.claim("g:a:1"), Claim::Fresh(_)));
        assert!(matches!(set.claim("g:a:1"), Claim::Existing));
        assert!(set.contains("g:a:1"));
    }

    #[test]
    fn dropped_guard_marks_failed() {
        let set = ResolvedSet::new();
        let Claim::Fresh(guard) = set.claim("g:a:1") else {
            panic!("expected fresh claim");
        };
        assert!(matches!(set.state("g:a:1"), Some(SlotState::Pending)));
        drop(guard);
        assert!(matches!(set.state("g:a:1"), Some(SlotState::Failed)));
        assert!(set.resolved().is_empty());
    }

    #[test]
    fn publish_makes_descriptor_available() {
        let set = ResolvedSet::new();
        let Claim::Fresh(guard) = set.claim("g:a:1") else {
            panic!("expected fresh claim");
        };
        guard.publish(descriptor("g:a:1"));

        let coordinate = Coordinate::parse("g:a:1").unwrap();
        assert!(set.descriptor(&coordinate).is_some());
        assert!(matches!(set.claim("g:a:1"), Claim::Existing));
        assert_eq!(set.resolved().keys().collect::<Vec<_>>(), vec!["g:a:1"]);
    }

    #[test]
    fn failed_slot_stays_claimed() {
        let set = ResolvedSet::new();
        let Claim::Fresh(guard) = set.claim("g:gone:1") else {
            panic!("expected fresh claim");
        };
        guard.fail();
        assert!(matches!(set.claim("g:gone:1"), Claim::Existing));
        let coordinate = Coordinate::parse("g:gone:1").unwrap();
        assert!(set.descriptor(&coordinate).is_none());
    }
}
