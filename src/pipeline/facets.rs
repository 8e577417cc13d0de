// src/pipeline/facets.rs
//! Filter categories that are actually present in the data, so the filter
//! menu never offers a choice that selects nothing.

use serde::Serialize;

use super::filter::FilterCategory;
use crate::types::AnalysisRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Present role families, in menu order.
    pub roles: Vec<FilterCategory>,
    /// Present experience bands, in menu order.
    pub experiences: Vec<FilterCategory>,
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.experiences.is_empty()
    }

    /// `All` is always offered; other categories only when present.
    pub fn offers(&self, category: FilterCategory) -> bool {
        category == FilterCategory::All
            || self.roles.contains(&category)
            || self.experiences.contains(&category)
    }
}

/// Derive facets from the whole record store. Never call this with an
/// already-filtered view: the selected category must stay on offer.
pub fn derive_facets(records: &[AnalysisRecord]) -> Facets {
    let present = |categories: &[FilterCategory]| -> Vec<FilterCategory> {
        categories
            .iter()
            .copied()
            .filter(|category| records.iter().any(|record| category.matches(record)))
            .collect()
    };

    Facets {
        roles: present(&FilterCategory::ROLE_FAMILIES),
        experiences: present(&FilterCategory::EXPERIENCE_BANDS),
    }
}
