//! Per-package overrides
//!
//! The override list is a single string of space-separated records:
//!
//! ```text
//! com.example.app:1:2.0:1 org.other:0:1.5
//! ```
//!
//! Each record is `package:filter:scale[:ignore]`. The first record whose
//! package matches exactly wins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tweaks for one package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppOverride {
    pub package: String,
    /// Drop pull samples larger than the filter threshold
    pub filter: bool,
    /// Divisor applied to every pull delta
    pub scale: f32,
    /// Disable the edge effect for this package entirely
    pub ignore: bool,
}

impl AppOverride {
    pub fn new(package: impl Into<String>, filter: bool, scale: f32, ignore: bool) -> Self {
        Self {
            package: package.into(),
            filter,
            scale,
            ignore,
        }
    }
}

impl Default for AppOverride {
    fn default() -> Self {
        Self::new(String::new(), false, 1.0, false)
    }
}

fn parse_flag(field: &str, record: &str) -> Result<bool> {
    match field.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::InvalidOverride(format!(
            "flag must be 0 or 1, got {:?} in {:?}",
            other, record
        ))),
    }
}

impl FromStr for AppOverride {
    type Err = Error;

    fn from_str(record: &str) -> Result<Self> {
        let parts: Vec<&str> = record.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(Error::InvalidOverride(format!(
                "expected 3 or 4 fields, got {} in {:?}",
                parts.len(),
                record
            )));
        }

        let package = parts[0].trim();
        if package.is_empty() {
            return Err(Error::InvalidOverride(format!("empty package in {:?}", record)));
        }

        let filter = parse_flag(parts[1], record)?;
        let scale: f32 = parts[2].trim().parse().map_err(|_| {
            Error::InvalidOverride(format!("bad scale {:?} in {:?}", parts[2], record))
        })?;
        if !scale.is_finite() {
            return Err(Error::InvalidOverride(format!("non-finite scale in {:?}", record)));
        }
        let ignore = match parts.get(3) {
            Some(field) => parse_flag(field, record)?,
            None => false,
        };

        Ok(Self::new(package, filter, scale, ignore))
    }
}

impl fmt::Display for AppOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{:?}:{}",
            self.package,
            u8::from(self.filter),
            self.scale,
            u8::from(self.ignore)
        )
    }
}

/// Parse every well-formed record, skipping the rest
pub fn parse_overrides(raw: &str) -> Vec<AppOverride> {
    raw.split_whitespace()
        .filter_map(|record| match record.parse::<AppOverride>() {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed override");
                None
            }
        })
        .collect()
}

/// First well-formed record for `package`
pub fn resolve(raw: &str, package: &str) -> Option<AppOverride> {
    raw.split_whitespace()
        .filter(|record| record.split(':').next() == Some(package))
        .find_map(|record| match record.parse::<AppOverride>() {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(package, error = %e, "Skipping malformed override");
                None
            }
        })
}

/// Serialise a list back into the stored form
pub fn format_overrides(entries: &[AppOverride]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
