//! Per-request search, filter and sort criteria.
//!
//! Every field is optional and defaults to "no constraint". The label filters
//! also treat the sentinel `"all"` and the empty string as no constraint; the
//! budget bounds treat the empty string that way.

use records::NumberLike;
use records::values::lenient_text;
use serde::{Deserialize, Serialize};

use crate::sort::{SortDirection, SortField};

/// Label value that disables a category, experience-level or location filter.
pub const ALL_SENTINEL: &str = "all";

/// Declarative search/filter/sort request for one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<NumberLike>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<NumberLike>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl FilterCriteria {
    pub fn with_search_term(self, term: &str) -> Self {
        Self {
            search_term: Some(term.to_string()),
            ..self
        }
    }

    pub fn with_category(self, category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..self
        }
    }

    pub fn with_experience_level(self, level: &str) -> Self {
        Self {
            experience_level: Some(level.to_string()),
            ..self
        }
    }

    pub fn with_location(self, location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..self
        }
    }

    pub fn with_budget_min(self, min: impl Into<NumberLike>) -> Self {
        Self {
            budget_min: Some(min.into()),
            ..self
        }
    }

    pub fn with_budget_max(self, max: impl Into<NumberLike>) -> Self {
        Self {
            budget_max: Some(max.into()),
            ..self
        }
    }

    pub fn with_sort(self, sort_by: &str, sort_order: &str) -> Self {
        Self {
            sort_by: Some(sort_by.to_string()),
            sort_order: Some(sort_order.to_string()),
            ..self
        }
    }

    /// The search term, if one is set and non-empty.
    pub fn active_search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }

    pub fn active_category(&self) -> Option<&str> {
        active_label(&self.category)
    }

    pub fn active_experience_level(&self) -> Option<&str> {
        active_label(&self.experience_level)
    }

    pub fn active_location(&self) -> Option<&str> {
        active_label(&self.location)
    }

    /// Parsed lower budget bound. A set but non-numeric bound is `NaN`.
    pub fn active_budget_min(&self) -> Option<f64> {
        active_bound(&self.budget_min)
    }

    /// Parsed upper budget bound. A set but non-numeric bound is `NaN`.
    pub fn active_budget_max(&self) -> Option<f64> {
        active_bound(&self.budget_max)
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_by
            .as_deref()
            .map_or(SortField::Unsorted, SortField::from_wire)
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_order
            .as_deref()
            .map_or(SortDirection::Descending, SortDirection::from_wire)
    }
}

fn active_label(label: &Option<String>) -> Option<&str> {
    label
        .as_deref()
        .filter(|label| !label.is_empty() && *label != ALL_SENTINEL)
}

fn active_bound(bound: &Option<NumberLike>) -> Option<f64> {
    bound
        .as_ref()
        .filter(|bound| !bound.is_blank())
        .map(NumberLike::to_f64)
}
