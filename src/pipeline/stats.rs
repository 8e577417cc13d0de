// src/pipeline/stats.rs
use serde::Serialize;
use std::collections::HashSet;

use crate::types::{AnalysisRecord, StatsResponse};

/// Summary counts over the whole record store, independent of the active
/// filter, sort and page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub distinct_role_types: usize,
    pub distinct_experience_levels: usize,
}

/// Distinctness is on the raw field text, no normalization.
pub fn aggregate(records: &[AnalysisRecord]) -> CollectionStats {
    let role_types: HashSet<&str> = records.iter().map(AnalysisRecord::role_type).collect();
    let experience_levels: HashSet<&str> = records
        .iter()
        .map(AnalysisRecord::experience_level)
        .collect();

    CollectionStats {
        total: records.len(),
        distinct_role_types: role_types.len(),
        distinct_experience_levels: experience_levels.len(),
    }
}

impl From<&StatsResponse> for CollectionStats {
    fn from(stats: &StatsResponse) -> Self {
        Self {
            total: usize::try_from(stats.total_analyses).unwrap_or(usize::MAX),
            distinct_role_types: stats.role_type_count(),
            distinct_experience_levels: stats.experience_level_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty() {
        assert_eq!(aggregate(&[]), CollectionStats::default());
    }

    #[test]
    fn test_distinct_counts_use_raw_text() {
        let records = vec![
            record("1", "Backend Developer", "Senior", 1),
            record("2", "backend developer", "Senior", 2),
            record("3", "Backend Developer", "Junior", 3),
        ];
        assert_eq!(
            aggregate(&records),
            CollectionStats {
                total: 3,
                distinct_role_types: 2,
                distinct_experience_levels: 2,
            }
        );
    }

    #[test]
    fn test_from_remote_stats() {
        let remote = StatsResponse {
            total_analyses: 4,
            role_distribution: BTreeMap::from([
                ("Backend Developer".to_string(), 3),
                ("Data Scientist".to_string(), 1),
            ]),
            experience_distribution: BTreeMap::from([("Senior".to_string(), 4)]),
        };
        assert_eq!(
            CollectionStats::from(&remote),
            CollectionStats {
                total: 4,
                distinct_role_types: 2,
                distinct_experience_levels: 1,
            }
        );
    }
}
