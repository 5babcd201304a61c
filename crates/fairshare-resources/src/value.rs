//! Per-dimension resource values.

use std::collections::BTreeSet;
use std::fmt;

/// An inclusive integer range, e.g. a block of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub begin: u64,
    pub end: u64,
}

impl Range {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    /// The parts of `self` not covered by `cut` (zero, one, or two pieces).
    fn minus(self, cut: &Range) -> Vec<Range> {
        if cut.end < self.begin || cut.begin > self.end {
            return vec![self];
        }
        let mut pieces = Vec::with_capacity(2);
        if cut.begin > self.begin {
            pieces.push(Range::new(self.begin, cut.begin - 1));
        }
        if cut.end < self.end {
            pieces.push(Range::new(cut.end + 1, self.end));
        }
        pieces
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// Sort ranges and merge any that overlap or touch.
pub(crate) fn coalesce(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort();
    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.begin <= last.end.saturating_add(1) => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn subtract_ranges(ranges: &[Range], remove: &[Range]) -> Vec<Range> {
    let mut remaining = Vec::with_capacity(ranges.len());
    for range in ranges {
        let mut pieces = vec![*range];
        for cut in remove {
            pieces = pieces.into_iter().flat_map(|p| p.minus(cut)).collect();
        }
        remaining.extend(pieces);
    }
    coalesce(remaining)
}

/// Which shape a dimension has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Ranges,
    Set,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Ranges => "ranges",
            ValueKind::Set => "set",
        };
        f.write_str(label)
    }
}

/// The quantity held in one resource dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A divisible quantity such as CPUs or megabytes of memory.
    Scalar(f64),
    /// Sorted, non-overlapping inclusive ranges.
    Ranges(Vec<Range>),
    /// Discrete named items.
    Set(BTreeSet<String>),
}

impl Value {
    /// Build a ranges value, normalizing order and overlaps.
    pub fn ranges(ranges: impl IntoIterator<Item = Range>) -> Self {
        Value::Ranges(coalesce(ranges.into_iter().collect()))
    }

    /// Build a set value.
    ///
    /// Items are stored verbatim; only items free of the text notation's
    /// delimiters print in a form that parses back to the same set.
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Ranges(_) => ValueKind::Ranges,
            Value::Set(_) => ValueKind::Set,
        }
    }

    /// True when the value contributes nothing (zero scalar, no ranges, no items).
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(v) => *v == 0.0,
            Value::Ranges(r) => r.is_empty(),
            Value::Set(s) => s.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The additive inverse used when subtracting from an absent dimension.
    ///
    /// Only scalars have one; ranges and sets cannot go below empty.
    pub(crate) fn negated(&self) -> Option<Value> {
        match self {
            Value::Scalar(v) => Some(Value::Scalar(-v)),
            _ => None,
        }
    }

    /// Combine `other` into `self`. Returns `false` when the kinds differ.
    pub(crate) fn try_add(&mut self, other: &Value) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => *a += b,
            (Value::Ranges(a), Value::Ranges(b)) => {
                let mut all = std::mem::take(a);
                all.extend_from_slice(b);
                *a = coalesce(all);
            }
            (Value::Set(a), Value::Set(b)) => a.extend(b.iter().cloned()),
            _ => return false,
        }
        true
    }

    /// Remove `other` from `self`. Returns `false` when the kinds differ.
    pub(crate) fn try_sub(&mut self, other: &Value) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => *a -= b,
            (Value::Ranges(a), Value::Ranges(b)) => *a = subtract_ranges(a, b),
            (Value::Set(a), Value::Set(b)) => a.retain(|item| !b.contains(item)),
            _ => return false,
        }
        true
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{v}"),
            Value::Ranges(ranges) => {
                f.write_str("[")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{range}")?;
                }
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(item)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesce_merges_overlapping_and_adjacent() {
        let merged = coalesce(vec![
            Range::new(10, 20),
            Range::new(1, 5),
            Range::new(6, 8),
            Range::new(15, 30),
        ]);
        assert_eq!(merged, vec![Range::new(1, 8), Range::new(10, 30)]);
    }

    #[test]
    fn coalesce_handles_u64_max() {
        let merged = coalesce(vec![
            Range::new(u64::MAX - 1, u64::MAX),
            Range::new(5, u64::MAX),
        ]);
        assert_eq!(merged, vec![Range::new(5, u64::MAX)]);
    }

    #[test]
    fn range_difference_splits_in_the_middle() {
        let mut ports = Value::ranges([Range::new(1000, 2000)]);
        assert!(ports.try_sub(&Value::ranges([Range::new(1200, 1299)])));
        assert_eq!(
            ports,
            Value::Ranges(vec![Range::new(1000, 1199), Range::new(1300, 2000)])
        );
    }

    #[test]
    fn range_difference_to_nothing() {
        let mut ports = Value::ranges([Range::new(5, 10)]);
        ports.try_sub(&Value::ranges([Range::new(0, 100)]));
        assert!(ports.is_empty());
    }

    #[test]
    fn set_union_and_difference() {
        let mut disks = Value::set(["sda"]);
        disks.try_add(&Value::set(["sdb", "sdc"]));
        disks.try_sub(&Value::set(["sda", "sdz"]));
        assert_eq!(disks, Value::set(["sdb", "sdc"]));
    }

    #[test]
    fn mismatched_kinds_are_rejected() {
        let mut cpus = Value::Scalar(2.0);
        assert!(!cpus.try_add(&Value::set(["a"])));
        assert_eq!(cpus, Value::Scalar(2.0));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Scalar(2.5).to_string(), "2.5");
        assert_eq!(Value::Scalar(4.0).to_string(), "4");
        assert_eq!(
            Value::ranges([Range::new(40, 41), Range::new(1, 2)]).to_string(),
            "[1-2, 40-41]"
        );
        assert_eq!(Value::set(["b", "a"]).to_string(), "{a,b}");
    }
}
