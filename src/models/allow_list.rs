//! The set of buckets this gateway is permitted to expose.

use std::{collections::BTreeSet, fmt};

/// Immutable allow-list of bucket names, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    buckets: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: buckets.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list, trimming entries and dropping blanks.
    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    pub fn contains(&self, bucket: &str) -> bool {
        self.buckets.contains(bucket)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.buckets.iter().map(String::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}
