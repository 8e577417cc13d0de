// src/types/analysis.rs
//! Wire model for saved analyses.
//!
//! The analysis service is loose about optional fields, so the decoders here
//! never reject a record because of a missing or mistyped analysis field: text
//! fields fall back to an empty string, `skills` to an empty list, and an
//! absent or unreadable `created_at` to `None`. Empty text matches no filter
//! category, which keeps the pipeline failing closed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One saved analysis, as returned by `GET /analyses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(rename = "analysis_id", alias = "id", alias = "_id", default)]
    pub id: String,
    /// Submitting user. Scoping happens server side; never filtered on locally.
    #[serde(rename = "username", alias = "owner", default)]
    pub owner: String,
    #[serde(rename = "job_description", default, deserialize_with = "lenient_string")]
    pub source_text: String,
    #[serde(rename = "analysis", default)]
    pub result: AnalysisResult,
    /// `None` when the service sent no readable timestamp; sorts as oldest.
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Structured output of the analysis service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub experience_level: String,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
}

impl AnalysisRecord {
    pub fn role_type(&self) -> &str {
        &self.result.role_type
    }

    pub fn experience_level(&self) -> &str {
        &self.result.experience_level
    }

    /// First `limit` skills in display order plus the count of hidden ones.
    pub fn skills_preview(&self, limit: usize) -> (&[String], usize) {
        let skills = &self.result.skills;
        let shown = skills.len().min(limit);
        (&skills[..shown], skills.len() - shown)
    }
}

/// Parse the timestamp formats the service emits: RFC 3339, or a naive
/// ISO-8601 datetime which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

fn lenient_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(skill) => Some(skill),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Null => return Ok(None),
        Value::String(raw) => Some(raw.as_str()),
        Value::Object(map) => map.get("$date").and_then(Value::as_str),
        _ => None,
    };

    let parsed = raw.and_then(parse_timestamp);
    if parsed.is_none() {
        warn!("Ignoring unreadable created_at value: {}", value);
    }
    Ok(parsed)
}
