//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, and the
//! constructor that turns one request's criteria into a pipeline.

use crate::criteria::FilterCriteria;
use crate::filters::{
    BudgetBound, BudgetFilter, ExactMatchFilter, MatchField, SearchScope, TextSearchFilter,
};
use crate::traits::Filter;
use anyhow::Result;
use records::ListRecord;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TextSearchFilter::new("logo", SearchScope::AllFields))
///     .add_filter(ExactMatchFilter::new(MatchField::Category, "Design"))
///     .add_filter(BudgetFilter::new(BudgetBound::Min(100.0)));
///
/// let filtered = pipeline.apply(records)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the pipeline for one request.
    ///
    /// Filters are added in a fixed order, and only when their criterion is
    /// active: text search, category, experience level, location, budget
    /// minimum, budget maximum.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let mut pipeline = Self::new();

        if let Some(term) = criteria.active_search_term() {
            pipeline = pipeline.add_filter(TextSearchFilter::new(term, SearchScope::AllFields));
        }
        if let Some(category) = criteria.active_category() {
            pipeline = pipeline.add_filter(ExactMatchFilter::new(MatchField::Category, category));
        }
        if let Some(level) = criteria.active_experience_level() {
            pipeline = pipeline.add_filter(ExactMatchFilter::new(MatchField::ExperienceLevel, level));
        }
        if let Some(location) = criteria.active_location() {
            pipeline = pipeline.add_filter(ExactMatchFilter::new(MatchField::Location, location));
        }
        if let Some(min) = criteria.active_budget_min() {
            pipeline = pipeline.add_filter(BudgetFilter::new(BudgetBound::Min(min)));
        }
        if let Some(max) = criteria.active_budget_max() {
            pipeline = pipeline.add_filter(BudgetFilter::new(BudgetBound::Max(max)));
        }

        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in application order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the records.
    ///
    /// ## Algorithm
    /// 1. Start with the input records
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    ///
    /// # Returns
    /// * `Ok(Vec<ListRecord>)` - The filtered records after all filters
    /// * `Err` - If any filter fails
    pub fn apply(&self, records: Vec<ListRecord>) -> Result<Vec<ListRecord>> {
        let mut current = records;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str, location: &str) -> ListRecord {
        ListRecord {
            title: Some(title.into()),
            location: Some(location.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();

        let records = vec![titled("a", "Remote"), titled("b", "Paris")];

        let filtered = pipeline.apply(records.clone()).unwrap();
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new()
            .add_filter(ExactMatchFilter::new(MatchField::Location, "Paris"));

        let records = vec![titled("a", "Remote"), titled("b", "Paris")];

        let filtered = pipeline.apply(records).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title_text().as_deref(), Some("b"));
    }

    #[test]
    fn test_from_criteria_skips_inactive_filters() {
        let pipeline = FilterPipeline::from_criteria(
            &FilterCriteria::default()
                .with_category("all")
                .with_location("")
                .with_budget_min(""),
        );
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_from_criteria_fixed_order() {
        let criteria = FilterCriteria::default()
            .with_budget_max(900_i64)
            .with_location("Remote")
            .with_search_term("logo")
            .with_budget_min(100_i64)
            .with_experience_level("expert")
            .with_category("Design");

        let pipeline = FilterPipeline::from_criteria(&criteria);
        assert_eq!(
            pipeline.filter_names(),
            vec![
                "TextSearchFilter",
                "CategoryFilter",
                "ExperienceLevelFilter",
                "LocationFilter",
                "BudgetMinFilter",
                "BudgetMaxFilter",
            ]
        );
    }
}
