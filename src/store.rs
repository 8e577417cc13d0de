// src/store.rs
use crate::types::AnalysisRecord;

/// Canonical copy of the signed-in user's analyses for this session.
///
/// Only ever replaced wholesale from a fetch; deletions reach it through the
/// refetch that follows a successful remote delete.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<AnalysisRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<AnalysisRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::numbered_records;

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());

        store.replace(numbered_records(3));
        assert_eq!(store.len(), 3);

        store.replace(numbered_records(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, "1");
    }
}
