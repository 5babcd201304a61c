//! fairshare-resources — resource vectors offered by worker nodes.
//!
//! A [`Resources`] value maps dimension names (`cpus`, `mem`, `ports`, ...)
//! to a [`Value`]: a scalar quantity, a list of inclusive integer ranges,
//! or a set of discrete items. Vectors combine with `+` and `-`, which is
//! all the fairness sorter needs from them.
//!
//! # Text notation
//!
//! ```text
//! cpus:4; mem:1024; ports:[31000-32000, 40000-40010]; disks:{sda,sdb}
//! ```
//!
//! The same notation is used by `Display`, `FromStr`, and serde. Any
//! vector produced by the parser prints back to text that parses to an
//! equal vector. The notation has no escaping: a dimension name or set
//! item built in code that contains `;`, `:`, `,`, brackets, braces, or
//! leading/trailing whitespace does not survive the trip.

pub mod error;
pub mod parse;
pub mod resources;
pub mod value;

pub use error::{ResourcesError, ResourcesResult};
pub use resources::Resources;
pub use value::{Range, Value, ValueKind};
