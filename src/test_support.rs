// src/test_support.rs
use chrono::{Duration, TimeZone, Utc};

use crate::types::{AnalysisRecord, AnalysisResult};

/// Record created `minute` minutes after a fixed epoch, so larger is newer.
pub fn record(id: &str, role_type: &str, experience_level: &str, minute: i64) -> AnalysisRecord {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    AnalysisRecord {
        id: id.to_string(),
        owner: "tester".to_string(),
        source_text: format!("job description {id}"),
        result: AnalysisResult {
            role_type: role_type.to_string(),
            experience_level: experience_level.to_string(),
            skills: vec!["rust".to_string(), "sql".to_string()],
            summary: format!("summary for {id}"),
        },
        created_at: Some(base + Duration::minutes(minute)),
    }
}

/// `count` records with ids "1".."count", where "1" is the newest.
pub fn numbered_records(count: usize) -> Vec<AnalysisRecord> {
    (1..=count)
        .map(|n| {
            let role = match n % 3 {
                0 => "Backend Developer",
                1 => "Frontend Developer",
                _ => "Data Scientist",
            };
            record(&n.to_string(), role, "Mid-level (3-5 years)", (count - n) as i64)
        })
        .collect()
}
