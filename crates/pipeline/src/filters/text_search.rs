//! Case-insensitive substring search.
//!
//! Two scopes exist: the full search used by `search_and_filter`, which looks
//! at one joined haystack of every text field, and the narrow post search,
//! which checks title, description and skills one by one.

use crate::traits::Filter;
use anyhow::Result;
use rayon::prelude::*;
use records::ListRecord;

/// Batches at least this large are searched on the rayon pool.
const PARALLEL_THRESHOLD: usize = 2_048;

/// Which fields a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Title, description, skills, category label, owner name and location,
    /// joined with single spaces.
    AllFields,
    /// Title, description and skills, each matched independently.
    TitleDescriptionSkills,
}

/// Keeps records whose text contains the search term, ignoring case.
pub struct TextSearchFilter {
    needle: String,
    scope: SearchScope,
}

impl TextSearchFilter {
    /// Create a new TextSearchFilter.
    ///
    /// # Arguments
    /// * `term` - The raw search term; it is lowercased once here
    /// * `scope` - Which fields to look at
    pub fn new(term: &str, scope: SearchScope) -> Self {
        Self {
            needle: term.to_lowercase(),
            scope,
        }
    }

    fn matches(&self, record: &ListRecord) -> bool {
        match self.scope {
            SearchScope::AllFields => record
                .search_haystack()
                .to_lowercase()
                .contains(&self.needle),
            SearchScope::TitleDescriptionSkills => [
                record.title_text(),
                record.description_text(),
                record.skills_text(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.needle)),
        }
    }
}

impl Filter for TextSearchFilter {
    fn name(&self) -> &str {
        match self.scope {
            SearchScope::AllFields => "TextSearchFilter",
            SearchScope::TitleDescriptionSkills => "PostSearchFilter",
        }
    }

    fn apply(&self, records: Vec<ListRecord>) -> Result<Vec<ListRecord>> {
        let filtered: Vec<ListRecord> = if records.len() >= PARALLEL_THRESHOLD {
            records
                .into_par_iter()
                .filter(|record| self.matches(record))
                .collect()
        } else {
            records
                .into_iter()
                .filter(|record| self.matches(record))
                .collect()
        };

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_records() -> Vec<ListRecord> {
        serde_json::from_value(json!([
            {"title": "Logo Design", "description": "Minimal brand mark"},
            {"title": "Backend API", "skills": "Rust, PostgreSQL", "category": "Programming"},
            {"title": "Wedding Photos", "owner": {"name": "Grace Hopper"}, "location": "Lisbon"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_all_fields_search_reaches_category_owner_location() {
        let by_category = TextSearchFilter::new("programming", SearchScope::AllFields)
            .apply(create_test_records())
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title_text().as_deref(), Some("Backend API"));

        let by_owner = TextSearchFilter::new("HOPPER", SearchScope::AllFields)
            .apply(create_test_records())
            .unwrap();
        assert_eq!(by_owner.len(), 1);

        let by_location = TextSearchFilter::new("lisbon", SearchScope::AllFields)
            .apply(create_test_records())
            .unwrap();
        assert_eq!(by_location[0].title_text().as_deref(), Some("Wedding Photos"));
    }

    #[test]
    fn test_all_fields_search_spans_joined_fields() {
        // "design minimal" only exists across the title/description boundary.
        let filtered = TextSearchFilter::new("design minimal", SearchScope::AllFields)
            .apply(create_test_records())
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_post_scope_ignores_category_and_owner() {
        let filter = TextSearchFilter::new("programming", SearchScope::TitleDescriptionSkills);
        assert!(filter.apply(create_test_records()).unwrap().is_empty());

        let filter = TextSearchFilter::new("postgres", SearchScope::TitleDescriptionSkills);
        assert_eq!(filter.apply(create_test_records()).unwrap().len(), 1);
    }

    #[test]
    fn test_post_scope_does_not_span_fields() {
        let filter = TextSearchFilter::new("design minimal", SearchScope::TitleDescriptionSkills);
        assert!(filter.apply(create_test_records()).unwrap().is_empty());
    }

    #[test]
    fn test_parallel_path_preserves_order() {
        let records: Vec<ListRecord> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| ListRecord {
                title: Some(if i % 3 == 0 { format!("match {i}") } else { format!("other {i}") }.into()),
                ..Default::default()
            })
            .collect();

        let filtered = TextSearchFilter::new("MATCH", SearchScope::AllFields)
            .apply(records)
            .unwrap();

        let expected: Vec<String> = (0..PARALLEL_THRESHOLD * 2)
            .filter(|i| i % 3 == 0)
            .map(|i| format!("match {i}"))
            .collect();
        let actual: Vec<String> = filtered
            .iter()
            .filter_map(|r| r.title_text().map(|t| t.into_owned()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_non_string_fields_are_searchable() {
        let records: Vec<ListRecord> = serde_json::from_value(json!([
            {"title": 2024, "skills": ["Rust", "Go"]},
            {"title": "Other", "description": null, "skills": {"primary": "rust"}}
        ]))
        .unwrap();

        let by_skill = TextSearchFilter::new("go", SearchScope::TitleDescriptionSkills)
            .apply(records.clone())
            .unwrap();
        assert_eq!(by_skill, vec![records[0].clone()]);

        let by_number = TextSearchFilter::new("202", SearchScope::AllFields)
            .apply(records.clone())
            .unwrap();
        assert_eq!(by_number, vec![records[0].clone()]);
    }
}
