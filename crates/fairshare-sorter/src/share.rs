//! Dominant share computation.

use fairshare_resources::Resources;

/// The largest fraction of any scalar resource that `allocation` holds
/// out of `total`.
///
/// Only scalar dimensions count; ranges and sets (ports, named devices)
/// do not take part in fairness. Dimensions whose total is not positive
/// are skipped rather than divided by. The result is never below 0 and
/// never NaN, so it is safe to use as a sort key.
pub fn dominant_share(allocation: &Resources, total: &Resources) -> f64 {
    total
        .scalars()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(name, amount)| allocation.get_scalar(name).unwrap_or(0.0) / amount)
        .fold(0.0, f64::max)
}
