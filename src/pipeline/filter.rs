// src/pipeline/filter.rs
//! Coarse classification of records by role family and experience band.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownKeyError;
use crate::types::AnalysisRecord;

/// Which record field a category is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterAxis {
    RoleFamily,
    ExperienceBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    #[default]
    All,
    Frontend,
    Backend,
    Fullstack,
    Data,
    Devops,
    Mobile,
    Junior,
    Mid,
    Senior,
}

impl FilterCategory {
    pub const ROLE_FAMILIES: [FilterCategory; 6] = [
        FilterCategory::Frontend,
        FilterCategory::Backend,
        FilterCategory::Fullstack,
        FilterCategory::Data,
        FilterCategory::Devops,
        FilterCategory::Mobile,
    ];

    pub const EXPERIENCE_BANDS: [FilterCategory; 3] = [
        FilterCategory::Junior,
        FilterCategory::Mid,
        FilterCategory::Senior,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FilterCategory::All => "all",
            FilterCategory::Frontend => "frontend",
            FilterCategory::Backend => "backend",
            FilterCategory::Fullstack => "fullstack",
            FilterCategory::Data => "data",
            FilterCategory::Devops => "devops",
            FilterCategory::Mobile => "mobile",
            FilterCategory::Junior => "junior",
            FilterCategory::Mid => "mid",
            FilterCategory::Senior => "senior",
        }
    }

    /// Human label used in the filter menu.
    pub fn label(self) -> &'static str {
        match self {
            FilterCategory::All => "All Types",
            FilterCategory::Frontend => "Frontend",
            FilterCategory::Backend => "Backend",
            FilterCategory::Fullstack => "Fullstack",
            FilterCategory::Data => "Data Science",
            FilterCategory::Devops => "DevOps",
            FilterCategory::Mobile => "Mobile",
            FilterCategory::Junior => "Junior",
            FilterCategory::Mid => "Mid-level",
            FilterCategory::Senior => "Senior",
        }
    }

    /// `None` for `All`, which is not tied to any field.
    pub fn axis(self) -> Option<FilterAxis> {
        match self {
            FilterCategory::All => None,
            FilterCategory::Frontend
            | FilterCategory::Backend
            | FilterCategory::Fullstack
            | FilterCategory::Data
            | FilterCategory::Devops
            | FilterCategory::Mobile => Some(FilterAxis::RoleFamily),
            FilterCategory::Junior | FilterCategory::Mid | FilterCategory::Senior => {
                Some(FilterAxis::ExperienceBand)
            }
        }
    }

    /// Lowercase substrings that place a field value in this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            FilterCategory::All => &[],
            FilterCategory::Frontend => &["frontend", "front-end", "front end"],
            FilterCategory::Backend => &["backend", "back-end", "back end"],
            FilterCategory::Fullstack => &["fullstack", "full-stack", "full stack"],
            FilterCategory::Data => &["data", "scientist", "analyst"],
            FilterCategory::Devops => &["devops", "infrastructure", "sre"],
            FilterCategory::Mobile => &["mobile", "ios", "android"],
            FilterCategory::Junior => &["junior", "0-2", "entry", "intern"],
            FilterCategory::Mid => &["mid", "3-5", "intermediate"],
            FilterCategory::Senior => &["senior", "5+", "lead", "principal"],
        }
    }

    /// Case-insensitive keyword test against a single field value.
    /// Empty values match nothing.
    pub fn matches_text(self, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        let lowered = value.to_lowercase();
        self.keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
    }

    pub fn matches(self, record: &AnalysisRecord) -> bool {
        match self.axis() {
            None => true,
            Some(FilterAxis::RoleFamily) => self.matches_text(record.role_type()),
            Some(FilterAxis::ExperienceBand) => self.matches_text(record.experience_level()),
        }
    }

    fn all_keys() -> String {
        std::iter::once(FilterCategory::All)
            .chain(Self::ROLE_FAMILIES)
            .chain(Self::EXPERIENCE_BANDS)
            .map(FilterCategory::key)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterCategory {
    type Err = UnknownKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        std::iter::once(FilterCategory::All)
            .chain(Self::ROLE_FAMILIES)
            .chain(Self::EXPERIENCE_BANDS)
            .find(|category| category.key() == normalized)
            .ok_or_else(|| UnknownKeyError {
                kind: "filter",
                value: value.to_string(),
                expected: Self::all_keys(),
            })
    }
}

/// Order-preserving selection of the records in `category`.
pub fn filter_records<'a>(
    records: &'a [AnalysisRecord],
    category: FilterCategory,
) -> Vec<&'a AnalysisRecord> {
    if category == FilterCategory::All {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| category.matches(record))
        .collect()
}

/// Every category the record falls into, `All` excluded.
pub fn classify(record: &AnalysisRecord) -> Vec<FilterCategory> {
    FilterCategory::ROLE_FAMILIES
        .into_iter()
        .chain(FilterCategory::EXPERIENCE_BANDS)
        .filter(|category| category.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_all_returns_input_in_order() {
        let records = vec![
            record("1", "Frontend Developer", "Junior", 1),
            record("2", "", "", 2),
            record("3", "Data Scientist", "Senior", 3),
        ];
        let ids: Vec<&str> = filter_records(&records, FilterCategory::All)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_backend_role_matches_only_backend_family() {
        let senior_backend = record("1", "Senior Backend Engineer", "Mid-level (3-5 years)", 1);

        assert!(FilterCategory::Backend.matches(&senior_backend));
        assert!(!FilterCategory::Frontend.matches(&senior_backend));
        // experience band reads experience_level, not role_type
        assert!(!FilterCategory::Senior.matches(&senior_backend));
        assert!(FilterCategory::Mid.matches(&senior_backend));
    }

    #[test]
    fn test_keyword_variants_case_insensitive() {
        assert!(FilterCategory::Frontend.matches_text("FRONT-END Engineer"));
        assert!(FilterCategory::Frontend.matches_text("Front End Dev"));
        assert!(FilterCategory::Fullstack.matches_text("Full Stack Developer"));
        assert!(FilterCategory::Devops.matches_text("Site Reliability (SRE)"));
        assert!(FilterCategory::Mobile.matches_text("iOS Developer"));
        assert!(FilterCategory::Data.matches_text("Business Analyst"));
        assert!(FilterCategory::Junior.matches_text("Entry level"));
        assert!(FilterCategory::Junior.matches_text("0-2 years"));
        assert!(FilterCategory::Senior.matches_text("Principal/Lead (8+ years)"));
        assert!(FilterCategory::Senior.matches_text("5+ years"));
        assert!(!FilterCategory::Backend.matches_text("Frontend Developer"));
    }

    #[test]
    fn test_empty_fields_fail_closed() {
        let blank = record("1", "", "   ", 1);
        for category in FilterCategory::ROLE_FAMILIES
            .into_iter()
            .chain(FilterCategory::EXPERIENCE_BANDS)
        {
            assert!(!category.matches(&blank), "{category} matched a blank record");
        }
        assert!(FilterCategory::All.matches(&blank));
    }

    #[test]
    fn test_filter_partitions_by_predicate() {
        let records = vec![
            record("1", "Backend Developer", "Junior", 1),
            record("2", "Frontend Developer", "Senior", 2),
            record("3", "Back-End Engineer", "Senior", 3),
            record("4", "Software Developer", "Mid-level", 4),
        ];

        let selected = filter_records(&records, FilterCategory::Backend);
        let ids: Vec<&str> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        for excluded in records.iter().filter(|r| !ids.contains(&r.id.as_str())) {
            assert!(!FilterCategory::Backend.matches(excluded));
        }
    }

    #[test]
    fn test_classify_multiple_categories() {
        let hybrid = record("1", "Fullstack Data Engineer", "Senior Lead", 1);
        assert_eq!(
            classify(&hybrid),
            vec![
                FilterCategory::Fullstack,
                FilterCategory::Data,
                FilterCategory::Senior
            ]
        );
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("Backend".parse::<FilterCategory>(), Ok(FilterCategory::Backend));
        assert_eq!(" all ".parse::<FilterCategory>(), Ok(FilterCategory::All));
        let err = "qa".parse::<FilterCategory>().unwrap_err();
        assert_eq!(err.kind, "filter");
        assert!(err.expected.starts_with("all, frontend"));
    }
}
