//! A ranked client and its ordering.

use std::cmp::Ordering;

use serde::Serialize;

/// One entry in the fairness ranking.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub name: String,
    /// Dominant share at the time this entry was (re)inserted.
    pub share: f64,
}

impl Client {
    pub fn new(name: impl Into<String>, share: f64) -> Self {
        Self {
            name: name.into(),
            share,
        }
    }
}

// Lower share first; equal shares fall back to the name so the order is
// total and deterministic. Shares are never NaN (see `dominant_share`).
impl Ord for Client {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.share.partial_cmp(&other.share) {
            Some(Ordering::Equal) | None => self.name.cmp(&other.name),
            Some(ord) => ord,
        }
    }
}

impl PartialOrd for Client {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Client {}
