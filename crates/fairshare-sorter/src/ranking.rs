//! Ordered set of active clients keyed by (share, name).

use std::collections::{BTreeSet, HashMap};

use crate::client::Client;

/// Active clients in priority order.
///
/// An entry's share is part of its ordering key, so a share change is a
/// remove followed by an insert ([`Ranking::reposition`]). The side index
/// remembers each member's current key so removal is an exact lookup.
#[derive(Debug, Default)]
pub struct Ranking {
    order: BTreeSet<Client>,
    index: HashMap<String, f64>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` with `share`, replacing any existing entry for it.
    pub fn insert(&mut self, name: &str, share: f64) {
        if let Some(old) = self.index.insert(name.to_string(), share) {
            self.order.remove(&Client::new(name, old));
        }
        self.order.insert(Client::new(name, share));
    }

    /// Remove `name`, returning its last share. `None` if it wasn't ranked.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let share = self.index.remove(name)?;
        self.order.remove(&Client::new(name, share));
        Some(share)
    }

    /// Move an existing member to the position for `share`.
    ///
    /// Returns `false` (and does nothing) if `name` is not ranked.
    pub fn reposition(&mut self, name: &str, share: f64) -> bool {
        if !self.index.contains_key(name) {
            return false;
        }
        self.insert(name, share);
        true
    }

    /// Recompute every member's share and rebuild the order in one pass.
    pub fn rebuild(&mut self, mut share_of: impl FnMut(&str) -> f64) {
        let mut order = BTreeSet::new();
        for (name, share) in self.index.iter_mut() {
            *share = share_of(name);
            order.insert(Client::new(name.as_str(), *share));
        }
        self.order = order;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The share `name` is currently ranked under.
    pub fn share(&self, name: &str) -> Option<f64> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members in priority order (lowest share first).
    pub fn iter(&self) -> impl Iterator<Item = &Client> + '_ {
        self.order.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|c| c.name.as_str())
    }
}
