//! Parser for the resource text notation.
//!
//! `name:value` pairs separated by `;`. A value is a number, a bracketed
//! list of `lo-hi` ranges, or a braced set of items. Repeated names are
//! combined with `+`.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{ResourcesError, ResourcesResult};
use crate::resources::Resources;
use crate::value::{Range, Value};

impl Resources {
    /// Parse a resource vector from its text notation.
    pub fn parse(text: &str) -> ResourcesResult<Self> {
        let mut resources = Resources::new();
        for token in text.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let (name, value) = parse_dimension(token)?;
            resources = resources.with(name, value);
        }
        Ok(resources)
    }
}

impl FromStr for Resources {
    type Err = ResourcesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resources::parse(s)
    }
}

fn parse_dimension(token: &str) -> ResourcesResult<(&str, Value)> {
    let (name, raw) = token
        .split_once(':')
        .ok_or_else(|| ResourcesError::MissingSeparator(token.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ResourcesError::EmptyName(token.to_string()));
    }
    let raw = raw.trim();

    let value = if let Some(body) = raw.strip_prefix('[') {
        let body = body
            .strip_suffix(']')
            .ok_or_else(|| unterminated(name, raw))?;
        parse_ranges(name, body)?
    } else if let Some(body) = raw.strip_prefix('{') {
        let body = body
            .strip_suffix('}')
            .ok_or_else(|| unterminated(name, raw))?;
        parse_set(body)
    } else {
        parse_scalar(name, raw)?
    };

    Ok((name, value))
}

fn parse_scalar(name: &str, raw: &str) -> ResourcesResult<Value> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Value::Scalar(v)),
        _ => Err(ResourcesError::InvalidScalar {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_ranges(name: &str, body: &str) -> ResourcesResult<Value> {
    let mut ranges = Vec::new();
    for item in body.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        let invalid = || ResourcesError::InvalidRange {
            name: name.to_string(),
            range: item.to_string(),
        };
        let (lo, hi) = match item.split_once('-') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            None => (item, item),
        };
        let begin: u64 = lo.parse().map_err(|_| invalid())?;
        let end: u64 = hi.parse().map_err(|_| invalid())?;
        if begin > end {
            return Err(invalid());
        }
        ranges.push(Range::new(begin, end));
    }
    Ok(Value::ranges(ranges))
}

fn parse_set(body: &str) -> Value {
    let items: BTreeSet<String> = body
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect();
    Value::Set(items)
}

fn unterminated(name: &str, raw: &str) -> ResourcesError {
    ResourcesError::Unterminated {
        name: name.to_string(),
        value: raw.to_string(),
    }
}
