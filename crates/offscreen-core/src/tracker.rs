//! Reconciliation of a live, externally owned collection against per-entity
//! visual state.
//!
//! A [`Tracker`] remembers one value `V` per key `K`. Each call to
//! [`Tracker::update`] asks a [`TrackPolicy`] for the current candidates,
//! filters them through the policy's existence test and then:
//!
//! 1. destroys the state of every tracked key that is no longer a candidate,
//! 2. creates state for every candidate that is not yet tracked,
//! 3. leaves everything else untouched.
//!
//! Per-frame work on the retained values is done by the caller through
//! [`Tracker::iter_mut`] and friends, not by the tracker.
//!
//! The tracked set after `update` is exactly the set of candidates that
//! passed the existence test. Values are moved into
//! [`TrackPolicy::destroy`], so a value cannot be destroyed twice.
//!
//! # Example
//!
//! ```
//! use offscreen_core::tracker::{TrackPolicy, Tracker};
//!
//! struct Evens(Vec<u32>);
//!
//! impl TrackPolicy<u32, String> for Evens {
//!     type Candidate = u32;
//!     fn candidates(&mut self) -> Vec<u32> { self.0.clone() }
//!     fn key(&self, c: &u32) -> u32 { *c }
//!     fn exists(&mut self, c: &u32) -> bool { c % 2 == 0 }
//!     fn create(&mut self, c: &u32) -> String { format!("#{c}") }
//! }
//!
//! let mut tracker = Tracker::new();
//! let report = tracker.update(&mut Evens(vec![1, 2, 3, 4]));
//! assert_eq!(report.created, 2);
//! assert_eq!(tracker.get(&4).map(String::as_str), Some("#4"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::TrackError;

// ---------------------------------------------------------------------------
// TrackPolicy
// ---------------------------------------------------------------------------

/// The four operations a [`Tracker`] is configured with.
///
/// `candidates` enumerates, `exists` filters, `create` builds state for a
/// newly seen key and `destroy` releases state for a key that went away.
/// `destroy` defaults to dropping the value.
pub trait TrackPolicy<K, V> {
    /// What the enumeration yields (usually a borrowed host record).
    type Candidate;

    fn candidates(&mut self) -> Vec<Self::Candidate>;

    /// Stable identity of a candidate.
    fn key(&self, candidate: &Self::Candidate) -> K;

    fn exists(&mut self, candidate: &Self::Candidate) -> bool;

    fn create(&mut self, candidate: &Self::Candidate) -> V;

    fn destroy(&mut self, _key: &K, _state: V) {}
}

// ---------------------------------------------------------------------------
// ReconcileReport
// ---------------------------------------------------------------------------

/// What one [`Tracker::update`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub destroyed: usize,
    /// Keys that were tracked before the call and still are.
    pub retained: usize,
}

impl ReconcileReport {
    /// Whether the tracked set changed.
    pub fn changed(&self) -> bool {
        self.created > 0 || self.destroyed > 0
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Owns one visual-state value per live key.
///
/// Keys are kept in a `BTreeMap`, so iteration order is the key order and
/// therefore deterministic for a given candidate set.
#[derive(Debug)]
pub struct Tracker<K, V> {
    tracked: BTreeMap<K, V>,
    /// Set by [`cleanup`](Self::cleanup); every later update is a no-op.
    retired: bool,
    total_created: u64,
    total_destroyed: u64,
}

impl<K: Ord + Clone, V> Default for Tracker<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> Tracker<K, V> {
    pub fn new() -> Self {
        Self {
            tracked: BTreeMap::new(),
            retired: false,
            total_created: 0,
            total_destroyed: 0,
        }
    }

    /// Reconcile the tracked set against the policy's current candidates.
    ///
    /// Runs in `O((tracked + candidates) log n)`. On a retired tracker this
    /// does nothing and returns an empty report.
    pub fn update<P>(&mut self, policy: &mut P) -> ReconcileReport
    where
        P: TrackPolicy<K, V>,
    {
        if self.retired {
            return ReconcileReport::default();
        }

        let mut present: BTreeSet<K> = BTreeSet::new();
        let mut fresh: Vec<(K, P::Candidate)> = Vec::new();
        for candidate in policy.candidates() {
            if !policy.exists(&candidate) {
                continue;
            }
            let key = policy.key(&candidate);
            // Duplicate candidates collapse onto the first occurrence.
            if !present.insert(key.clone()) {
                continue;
            }
            if !self.tracked.contains_key(&key) {
                fresh.push((key, candidate));
            }
        }

        let gone: Vec<K> = self
            .tracked
            .keys()
            .filter(|key| !present.contains(*key))
            .cloned()
            .collect();

        let mut report = ReconcileReport::default();
        for key in gone {
            if let Some(state) = self.tracked.remove(&key) {
                policy.destroy(&key, state);
                report.destroyed += 1;
            }
        }
        report.retained = self.tracked.len();

        for (key, candidate) in fresh {
            let state = policy.create(&candidate);
            self.tracked.insert(key, state);
            report.created += 1;
        }

        self.total_created += report.created as u64;
        self.total_destroyed += report.destroyed as u64;

        if report.changed() {
            tracing::trace!(
                created = report.created,
                destroyed = report.destroyed,
                retained = report.retained,
                "tracker reconciled"
            );
        }
        report
    }

    /// Like [`update`](Self::update), but reports use after cleanup as an
    /// error instead of silently doing nothing.
    pub fn try_update<P>(&mut self, policy: &mut P) -> Result<ReconcileReport, TrackError>
    where
        P: TrackPolicy<K, V>,
    {
        if self.retired {
            return Err(TrackError::Retired);
        }
        Ok(self.update(policy))
    }

    /// Destroy every tracked value but keep the tracker usable.
    ///
    /// Returns how many values were destroyed.
    pub fn clear(&mut self, mut destroy: impl FnMut(&K, V)) -> usize {
        let drained = std::mem::take(&mut self.tracked);
        let count = drained.len();
        for (key, state) in drained {
            destroy(&key, state);
        }
        self.total_destroyed += count as u64;
        count
    }

    /// Destroy every tracked value and retire the tracker.
    ///
    /// Later [`update`](Self::update) calls are no-ops. Calling `cleanup`
    /// again destroys nothing.
    pub fn cleanup(&mut self, destroy: impl FnMut(&K, V)) -> usize {
        let count = self.clear(destroy);
        self.retired = true;
        count
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tracked.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tracked.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tracked.get_mut(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.tracked.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.tracked.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.tracked.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.tracked.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.tracked.iter_mut()
    }

    /// Lifetime totals `(created, destroyed)`; their difference is
    /// always [`len`](Self::len).
    pub fn totals(&self) -> (u64, u64) {
        (self.total_created, self.total_destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// A scripted policy: candidate names with an existence flag, logging
    /// every create/destroy.
    #[derive(Default)]
    struct Script {
        candidates: Vec<(&'static str, bool)>,
        log: Vec<String>,
    }

    impl TrackPolicy<&'static str, u32> for Script {
        type Candidate = (&'static str, bool);

        fn candidates(&mut self) -> Vec<Self::Candidate> {
            self.candidates.clone()
        }

        fn key(&self, c: &Self::Candidate) -> &'static str {
            c.0
        }

        fn exists(&mut self, c: &Self::Candidate) -> bool {
            c.1
        }

        fn create(&mut self, c: &Self::Candidate) -> u32 {
            self.log.push(format!("create {}", c.0));
            c.0.len() as u32
        }

        fn destroy(&mut self, key: &&'static str, _state: u32) {
            self.log.push(format!("destroy {key}"));
        }
    }

    #[test]
    fn swaps_departed_for_arrived() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true), ("B", true)],
            ..Default::default()
        };
        tracker.update(&mut policy);
        policy.log.clear();

        policy.candidates = vec![("B", true), ("C", true)];
        let report = tracker.update(&mut policy);

        assert_eq!(policy.log, vec!["destroy A", "create C"]);
        assert_eq!(
            report,
            ReconcileReport {
                created: 1,
                destroyed: 1,
                retained: 1
            }
        );
        assert_eq!(tracker.keys().copied().collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn failing_existence_test_removes_tracked_key() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true)],
            ..Default::default()
        };
        tracker.update(&mut policy);
        policy.candidates = vec![("A", false)];
        tracker.update(&mut policy);
        assert!(tracker.is_empty());
        assert_eq!(policy.log, vec!["create A", "destroy A"]);
    }

    #[test]
    fn duplicate_candidates_create_once() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true), ("A", true)],
            ..Default::default()
        };
        let report = tracker.update(&mut policy);
        assert_eq!(report.created, 1);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn retained_state_is_not_recreated() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true)],
            ..Default::default()
        };
        tracker.update(&mut policy);
        if let Some(v) = tracker.get_mut(&"A") {
            *v = 99;
        }
        tracker.update(&mut policy);
        assert_eq!(tracker.get(&"A"), Some(&99));
        assert_eq!(policy.log, vec!["create A"]);
    }

    #[test]
    fn cleanup_destroys_all_and_retires() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true), ("B", true)],
            ..Default::default()
        };
        tracker.update(&mut policy);

        let mut destroyed = BTreeMap::new();
        let count = tracker.cleanup(|k, v| {
            destroyed.insert(*k, v);
        });
        assert_eq!(count, 2);
        assert_eq!(destroyed.len(), 2);
        assert!(tracker.is_retired());

        policy.candidates = vec![("C", true)];
        let report = tracker.update(&mut policy);
        assert_eq!(report, ReconcileReport::default());
        assert!(tracker.is_empty());
        assert!(matches!(
            tracker.try_update(&mut policy),
            Err(TrackError::Retired)
        ));
        assert_eq!(tracker.cleanup(|_, _| {}), 0);
    }

    #[test]
    fn clear_keeps_tracker_usable() {
        let mut tracker = Tracker::new();
        let mut policy = Script {
            candidates: vec![("A", true)],
            ..Default::default()
        };
        tracker.update(&mut policy);
        assert_eq!(tracker.clear(|_, _| {}), 1);
        assert!(!tracker.is_retired());
        tracker.update(&mut policy);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.totals(), (2, 1));
    }
}
