//! The interface an allocator drives.

use fairshare_resources::Resources;

use crate::client::Client;

/// Orders competing clients for resource offers.
///
/// Names are opaque client identifiers (framework ids in practice).
pub trait Sorter {
    /// Register a new client with an empty allocation. It starts active.
    ///
    /// Registering a name twice is a caller bug.
    fn add(&mut self, name: &str);

    /// Forget a client entirely, active or not. Unknown names are ignored.
    fn remove(&mut self, name: &str);

    /// Make a registered client visible in the ordering again.
    ///
    /// # Panics
    ///
    /// Panics if `name` was never registered: that means the allocator's
    /// own bookkeeping is inconsistent.
    fn activate(&mut self, name: &str);

    /// Hide a client from the ordering while keeping its allocation.
    fn deactivate(&mut self, name: &str);

    /// Record that `resources` were allocated to `name`.
    fn allocated(&mut self, name: &str, resources: &Resources);

    /// Record that `resources` were returned by `name`.
    fn unallocated(&mut self, name: &str, resources: &Resources);

    /// Everything currently allocated to `name` (empty if unknown).
    fn allocation(&self, name: &str) -> Resources;

    /// Grow the cluster-wide total, e.g. when a worker node registers.
    fn add_resources(&mut self, resources: &Resources);

    /// Shrink the cluster-wide total, e.g. when a worker node is lost.
    fn remove_resources(&mut self, resources: &Resources);

    /// Active client names, highest priority first.
    fn sort(&mut self) -> Vec<String>;

    /// Like [`Sorter::sort`], but with each client's current share.
    fn shares(&mut self) -> Vec<Client>;

    /// Whether `name` is registered (active or not).
    fn contains(&self, name: &str) -> bool;

    /// Number of registered clients.
    fn count(&self) -> usize;
}
