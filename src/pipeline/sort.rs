// src/pipeline/sort.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::UnknownKeyError;
use crate::types::AnalysisRecord;

/// How to order the filtered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Role type, A to Z.
    Role,
    /// Experience level, A to Z.
    Experience,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::Role,
        SortKey::Experience,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Role => "role",
            SortKey::Experience => "experience",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::Role => "Role Type",
            SortKey::Experience => "Experience Level",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortKey {
    type Err = UnknownKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.key() == normalized)
            .ok_or_else(|| UnknownKeyError {
                kind: "sort",
                value: value.to_string(),
                expected: Self::ALL.map(SortKey::key).join(", "),
            })
    }
}

/// Reorder in place. Ties fall back to ascending record id. Records without
/// a timestamp count as older than any dated record.
pub fn sort_records(records: &mut [&AnalysisRecord], key: SortKey) {
    match key {
        SortKey::Newest => records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Oldest => records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Role => records.sort_by(|a, b| {
            locale_compare(a.role_type(), b.role_type()).then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Experience => records.sort_by(|a, b| {
            locale_compare(a.experience_level(), b.experience_level())
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
}

/// Like [`sort_records`] for a key given by name; unknown names keep the
/// current order.
pub fn sort_by_name(records: &mut [&AnalysisRecord], name: &str) {
    match name.parse::<SortKey>() {
        Ok(key) => sort_records(records, key),
        Err(err) => debug!("Leaving order unchanged: {}", err),
    }
}

/// Case-insensitive ordering; among strings equal ignoring case, lowercase
/// sorts before uppercase at the first difference.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
