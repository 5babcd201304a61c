//! The `Resources` vector and its arithmetic.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::value::Value;

/// A bundle of named resource dimensions.
///
/// Dimensions are kept in name order, and a dimension whose value becomes
/// empty after arithmetic is dropped, so two vectors describing the same
/// quantities always compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    dimensions: BTreeMap<String, Value>,
}

impl Resources {
    /// The zero vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: combine one more dimension into the vector.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.add_dimension(&name.into(), &value);
        self
    }

    /// Shorthand for a vector holding a single scalar dimension.
    pub fn scalar(name: impl Into<String>, amount: f64) -> Self {
        Self::new().with(name, Value::Scalar(amount))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.dimensions.get(name)
    }

    /// The value of a scalar dimension, `None` if absent or not a scalar.
    pub fn get_scalar(&self, name: &str) -> Option<f64> {
        self.dimensions.get(name).and_then(Value::as_scalar)
    }

    /// Iterate over the scalar dimensions only.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.dimensions
            .iter()
            .filter_map(|(name, value)| value.as_scalar().map(|v| (name.as_str(), v)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.dimensions.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    fn add_dimension(&mut self, name: &str, value: &Value) {
        match self.dimensions.get_mut(name) {
            Some(existing) => {
                if !existing.try_add(value) {
                    warn!(
                        dimension = name,
                        existing = %existing.kind(),
                        added = %value.kind(),
                        "ignoring resource of mismatched kind"
                    );
                    return;
                }
                if existing.is_empty() {
                    self.dimensions.remove(name);
                }
            }
            None if !value.is_empty() => {
                self.dimensions.insert(name.to_string(), value.clone());
            }
            None => {}
        }
    }

    fn subtract_dimension(&mut self, name: &str, value: &Value) {
        match self.dimensions.get_mut(name) {
            Some(existing) => {
                if !existing.try_sub(value) {
                    warn!(
                        dimension = name,
                        existing = %existing.kind(),
                        subtracted = %value.kind(),
                        "ignoring resource of mismatched kind"
                    );
                    return;
                }
                if existing.is_empty() {
                    self.dimensions.remove(name);
                }
            }
            None => {
                if let Some(negated) = value.negated().filter(|v| !v.is_empty()) {
                    self.dimensions.insert(name.to_string(), negated);
                }
            }
        }
    }
}

impl AddAssign<&Resources> for Resources {
    fn add_assign(&mut self, rhs: &Resources) {
        for (name, value) in &rhs.dimensions {
            self.add_dimension(name, value);
        }
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self += &rhs;
    }
}

impl SubAssign<&Resources> for Resources {
    fn sub_assign(&mut self, rhs: &Resources) {
        for (name, value) in &rhs.dimensions {
            self.subtract_dimension(name, value);
        }
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Resources) {
        *self -= &rhs;
    }
}

impl Add<&Resources> for Resources {
    type Output = Resources;

    fn add(mut self, rhs: &Resources) -> Resources {
        self += rhs;
        self
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(mut self, rhs: Resources) -> Resources {
        self += &rhs;
        self
    }
}

impl Sub<&Resources> for Resources {
    type Output = Resources;

    fn sub(mut self, rhs: &Resources) -> Resources {
        self -= rhs;
        self
    }
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(mut self, rhs: Resources) -> Resources {
        self -= &rhs;
        self
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.dimensions.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}

impl Serialize for Resources {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Resources {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
