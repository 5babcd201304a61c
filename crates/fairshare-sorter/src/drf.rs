//! Dominant Resource Fairness sorter.

use std::collections::HashMap;

use fairshare_resources::Resources;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::ranking::Ranking;
use crate::share::dominant_share;
use crate::sorter::Sorter;

/// Counters describing how much share recomputation has happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SorterStats {
    /// Full passes over every active client (one per dirty `sort()`).
    pub full_recomputes: u64,
    /// Single-client repositions after an allocation change.
    pub incremental_updates: u64,
}

/// Ranks clients by ascending dominant share.
///
/// Shares cached in the ranking are stale exactly while `dirty` is set,
/// and only a full pass in `sort()` clears it.
#[derive(Debug, Default)]
pub struct DrfSorter {
    /// Cluster-wide resources currently known to the allocator.
    total: Resources,
    /// Every registered client, active or not.
    allocations: HashMap<String, Resources>,
    /// Active clients only.
    ranking: Ranking,
    dirty: bool,
    stats: SorterStats,
}

impl DrfSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cluster-wide total.
    pub fn total(&self) -> &Resources {
        &self.total
    }

    /// Whether total resources changed since the last full recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn stats(&self) -> SorterStats {
        self.stats
    }

    fn calculate_share(&self, name: &str) -> f64 {
        match self.allocations.get(name) {
            Some(allocation) => dominant_share(allocation, &self.total),
            None => 0.0,
        }
    }

    /// Reposition one active client after its allocation changed.
    fn update(&mut self, name: &str) {
        let share = self.calculate_share(name);
        if self.ranking.reposition(name, share) {
            self.stats.incremental_updates += 1;
            debug!(client = name, share, "client repositioned");
        }
    }

    /// Bring every cached share up to date if the total has changed.
    fn reconcile(&mut self) {
        if !self.dirty {
            return;
        }
        let allocations = &self.allocations;
        let total = &self.total;
        self.ranking.rebuild(|name| match allocations.get(name) {
            Some(allocation) => dominant_share(allocation, total),
            None => 0.0,
        });
        self.dirty = false;
        self.stats.full_recomputes += 1;
        info!(
            clients = self.ranking.len(),
            total = %self.total,
            "recomputed all shares"
        );
    }
}

impl Sorter for DrfSorter {
    fn add(&mut self, name: &str) {
        debug_assert!(
            !self.allocations.contains_key(name),
            "client '{name}' is already registered"
        );
        self.allocations.insert(name.to_string(), Resources::new());
        self.ranking.insert(name, 0.0);
        debug!(client = name, "client added");
    }

    fn remove(&mut self, name: &str) {
        self.ranking.remove(name);
        if self.allocations.remove(name).is_some() {
            debug!(client = name, "client removed");
        }
    }

    fn activate(&mut self, name: &str) {
        assert!(
            self.allocations.contains_key(name),
            "cannot activate unregistered client '{name}'"
        );
        let share = self.calculate_share(name);
        self.ranking.insert(name, share);
        debug!(client = name, share, "client activated");
    }

    fn deactivate(&mut self, name: &str) {
        if self.ranking.remove(name).is_some() {
            debug!(client = name, "client deactivated");
        }
    }

    fn allocated(&mut self, name: &str, resources: &Resources) {
        let Some(allocation) = self.allocations.get_mut(name) else {
            warn!(client = name, %resources, "allocation for unregistered client ignored");
            return;
        };
        *allocation += resources;

        // A pending full recompute will supersede this client's update.
        if !self.dirty {
            self.update(name);
        }
    }

    fn unallocated(&mut self, name: &str, resources: &Resources) {
        let Some(allocation) = self.allocations.get_mut(name) else {
            warn!(client = name, %resources, "deallocation for unregistered client ignored");
            return;
        };
        *allocation -= resources;

        if allocation.scalars().any(|(_, amount)| amount < 0.0) {
            warn!(
                client = name,
                allocation = %allocation,
                "allocation went negative; more was returned than allocated"
            );
        }

        if !self.dirty {
            self.update(name);
        }
    }

    fn allocation(&self, name: &str) -> Resources {
        self.allocations.get(name).cloned().unwrap_or_default()
    }

    fn add_resources(&mut self, resources: &Resources) {
        self.total += resources;
        // Defer the recompute to the next sort so a burst of node
        // registrations costs a single pass.
        self.dirty = true;
        debug!(%resources, total = %self.total, "total resources grew");
    }

    fn remove_resources(&mut self, resources: &Resources) {
        self.total -= resources;
        self.dirty = true;
        debug!(%resources, total = %self.total, "total resources shrank");
    }

    fn sort(&mut self) -> Vec<String> {
        self.reconcile();
        self.ranking.names().map(str::to_string).collect()
    }

    fn shares(&mut self) -> Vec<Client> {
        self.reconcile();
        self.ranking.iter().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.allocations.contains_key(name)
    }

    fn count(&self) -> usize {
        self.allocations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Resources {
        Resources::parse(text).unwrap()
    }

    #[test]
    fn new_sorter_is_empty_and_clean() {
        let mut sorter = DrfSorter::new();
        assert_eq!(sorter.count(), 0);
        assert!(!sorter.is_dirty());
        assert!(sorter.sort().is_empty());
        assert_eq!(sorter.stats(), SorterStats::default());
    }

    #[test]
    fn pool_changes_mark_dirty_until_sort() {
        let mut sorter = DrfSorter::new();
        sorter.add_resources(&parse("cpus:4"));
        assert!(sorter.is_dirty());

        sorter.sort();
        assert!(!sorter.is_dirty());

        sorter.remove_resources(&parse("cpus:1"));
        assert!(sorter.is_dirty());
        assert_eq!(sorter.total(), &parse("cpus:3"));
    }

    #[test]
    fn allocation_while_dirty_is_deferred() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add_resources(&parse("cpus:10"));
        sorter.allocated("a", &parse("cpus:5"));

        assert_eq!(sorter.stats().incremental_updates, 0);

        let shares = sorter.shares();
        assert_eq!(shares.len(), 1);
        assert!((shares[0].share - 0.5).abs() < 1e-12);
        assert_eq!(sorter.stats().full_recomputes, 1);
    }

    #[test]
    fn allocation_while_clean_repositions_immediately() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add("b");
        sorter.add_resources(&parse("cpus:10"));
        sorter.sort();

        sorter.allocated("a", &parse("cpus:1"));
        assert_eq!(sorter.stats().incremental_updates, 1);
        assert_eq!(sorter.ranking.share("a"), Some(0.1));
        assert_eq!(sorter.sort(), vec!["b", "a"]);
        assert_eq!(sorter.stats().full_recomputes, 1);
    }

    #[test]
    fn allocation_to_inactive_client_updates_table_only() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add_resources(&parse("cpus:10"));
        sorter.sort();
        sorter.deactivate("a");

        sorter.allocated("a", &parse("cpus:2"));

        assert_eq!(sorter.allocation("a"), parse("cpus:2"));
        assert!(sorter.sort().is_empty());
        assert_eq!(sorter.stats().incremental_updates, 0);
    }

    #[test]
    fn unknown_client_allocation_is_ignored() {
        let mut sorter = DrfSorter::new();
        sorter.allocated("ghost", &parse("cpus:1"));
        sorter.unallocated("ghost", &parse("cpus:1"));

        assert!(!sorter.contains("ghost"));
        assert_eq!(sorter.count(), 0);
        assert!(sorter.allocation("ghost").is_empty());
    }

    #[test]
    fn over_unallocation_is_not_clamped() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add_resources(&parse("cpus:10"));
        sorter.allocated("a", &parse("cpus:1"));
        sorter.unallocated("a", &parse("cpus:3"));

        assert_eq!(sorter.allocation("a").get_scalar("cpus"), Some(-2.0));
        let shares = sorter.shares();
        assert_eq!(shares[0].share, 0.0);
    }

    #[test]
    fn activate_twice_keeps_one_entry() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.activate("a");
        assert_eq!(sorter.sort(), vec!["a"]);
    }

    #[test]
    #[should_panic(expected = "cannot activate unregistered client 'ghost'")]
    fn activating_unregistered_client_panics() {
        let mut sorter = DrfSorter::new();
        sorter.activate("ghost");
    }

    #[test]
    fn remove_is_safe_for_any_state() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add("b");
        sorter.deactivate("b");

        sorter.remove("a");
        sorter.remove("b");
        sorter.remove("never-added");

        assert_eq!(sorter.count(), 0);
        assert!(sorter.sort().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "client 'a' is already registered")]
    fn duplicate_add_is_caught_in_debug_builds() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add("a");
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn duplicate_add_resets_the_client() {
        let mut sorter = DrfSorter::new();
        sorter.add_resources(&parse("cpus:10"));
        sorter.add("a");
        sorter.allocated("a", &parse("cpus:4"));

        sorter.add("a");

        assert_eq!(sorter.count(), 1);
        assert!(sorter.allocation("a").is_empty());
        let shares = sorter.shares();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share, 0.0);
    }

    #[test]
    fn stats_and_clients_serialize_with_field_names() {
        let mut sorter = DrfSorter::new();
        sorter.add("a");
        sorter.add_resources(&parse("cpus:4"));
        sorter.allocated("a", &parse("cpus:1"));

        let clients = serde_json::to_value(sorter.shares()).unwrap();
        assert_eq!(clients, serde_json::json!([{ "name": "a", "share": 0.25 }]));

        sorter.allocated("a", &parse("cpus:1"));
        let stats = serde_json::to_value(sorter.stats()).unwrap();
        assert_eq!(
            stats,
            serde_json::json!({ "full_recomputes": 1, "incremental_updates": 1 })
        );
    }
}
