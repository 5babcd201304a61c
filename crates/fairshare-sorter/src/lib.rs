//! fairshare-sorter — decides which framework is offered resources next.
//!
//! The allocator registers frameworks ("clients") with a [`Sorter`],
//! reports every allocation and every change to the cluster's total
//! resources, and calls [`Sorter::sort`] before each allocation cycle to
//! get the clients in fairness-priority order.
//!
//! [`DrfSorter`] implements Dominant Resource Fairness: a client's
//! priority is its dominant share, the largest fraction of any scalar
//! resource it holds, and the least-served client comes first.
//!
//! # Architecture
//!
//! ```text
//! DrfSorter (implements Sorter)
//!   ├── total        cluster-wide Resources; changes set `dirty`
//!   ├── allocations  client name → allocated Resources
//!   └── Ranking      active clients ordered by (share, name)
//!                    └── dominant_share() computes each key
//! ```
//!
//! Allocation changes reposition one client immediately. Total-resource
//! changes only mark the sorter dirty; the next `sort()` recomputes every
//! share in a single pass.
//!
//! The sorter is synchronous and not internally synchronized: it is meant
//! to be owned by a single allocator loop.

pub mod client;
pub mod drf;
pub mod ranking;
pub mod share;
pub mod sorter;

pub use client::Client;
pub use drf::{DrfSorter, SorterStats};
pub use ranking::Ranking;
pub use share::dominant_share;
pub use sorter::Sorter;
