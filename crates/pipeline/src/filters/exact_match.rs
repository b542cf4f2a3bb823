//! Exact label filters for category, experience level and location.

use crate::traits::Filter;
use anyhow::Result;
use records::ListRecord;

/// The record field an [`ExactMatchFilter`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    /// Resolved category label (`category.name` or the bare label).
    Category,
    ExperienceLevel,
    Location,
}

impl MatchField {
    fn extract(self, record: &ListRecord) -> Option<&str> {
        match self {
            MatchField::Category => record.category_label(),
            MatchField::ExperienceLevel => record.experience_level_label(),
            MatchField::Location => record.location_label(),
        }
    }
}

/// Keeps records whose field equals the expected label, case-sensitively.
/// Records without the field, or with a non-string value, are dropped.
pub struct ExactMatchFilter {
    field: MatchField,
    expected: String,
}

impl ExactMatchFilter {
    pub fn new(field: MatchField, expected: &str) -> Self {
        Self {
            field,
            expected: expected.to_string(),
        }
    }
}

impl Filter for ExactMatchFilter {
    fn name(&self) -> &str {
        match self.field {
            MatchField::Category => "CategoryFilter",
            MatchField::ExperienceLevel => "ExperienceLevelFilter",
            MatchField::Location => "LocationFilter",
        }
    }

    fn apply(&self, records: Vec<ListRecord>) -> Result<Vec<ListRecord>> {
        let filtered: Vec<ListRecord> = records
            .into_iter()
            .filter(|record| self.field.extract(record) == Some(self.expected.as_str()))
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn listings(values: Value) -> Vec<ListRecord> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn test_category_filter_resolves_object_names() {
        let records = listings(json!([
            {"category": {"name": "Design"}},
            {"category": "Design"},
            {"category": "design"},
            {}
        ]));

        let filtered = ExactMatchFilter::new(MatchField::Category, "Design")
            .apply(records)
            .unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_experience_and_location_filters() {
        let records = listings(json!([
            {"experienceLevel": "expert", "location": "Remote"},
            {"experienceLevel": "entry", "location": "Berlin"}
        ]));

        let experts = ExactMatchFilter::new(MatchField::ExperienceLevel, "expert")
            .apply(records.clone())
            .unwrap();
        assert_eq!(experts.len(), 1);
        assert_eq!(experts[0].location_label(), Some("Remote"));

        let berlin = ExactMatchFilter::new(MatchField::Location, "Berlin")
            .apply(records)
            .unwrap();
        assert_eq!(berlin[0].experience_level_label(), Some("entry"));
    }

    #[test]
    fn test_numbers_do_not_match_their_text() {
        let records = listings(json!([
            {"experienceLevel": 3, "location": 75001, "category": {"name": 7}},
            {"experienceLevel": "3", "location": "75001", "category": "7"}
        ]));

        for (field, expected) in [
            (MatchField::ExperienceLevel, "3"),
            (MatchField::Location, "75001"),
            (MatchField::Category, "7"),
        ] {
            let filtered = ExactMatchFilter::new(field, expected)
                .apply(records.clone())
                .unwrap();
            assert_eq!(filtered, vec![records[1].clone()]);
        }
    }
}
