//! Core domain types for marketplace listings.
//!
//! A [`ListRecord`] is either a job posting or a service-availability posting
//! as returned by the REST API. Fields keep the JSON value they arrived with,
//! whatever its type, so a record serializes back to exactly what was
//! received. The accessors derive the typed views the pipeline needs, and
//! each one spells out its fallback.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::values::{DateLike, NumberLike, present, text_view};

/// One job or service posting under search, filter and sort.
///
/// Keys the processor does not look at are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Free-form, comma-separated skill tokens.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Value>,
    /// A bare label, or an object with a `name`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    /// The posting's author, usually an object with a `name`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub budget: Option<NumberLike>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateLike>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateLike>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub views: Option<NumberLike>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn text_field(field: &Option<Value>) -> Option<Cow<'_, str>> {
    field.as_ref().and_then(text_view)
}

fn string_field(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

impl ListRecord {
    pub fn title_text(&self) -> Option<Cow<'_, str>> {
        text_field(&self.title)
    }

    pub fn description_text(&self) -> Option<Cow<'_, str>> {
        text_field(&self.description)
    }

    pub fn skills_text(&self) -> Option<Cow<'_, str>> {
        text_field(&self.skills)
    }

    pub fn location_text(&self) -> Option<Cow<'_, str>> {
        text_field(&self.location)
    }

    /// Resolved category: the object's `name`, otherwise the category itself.
    pub fn category_value(&self) -> Option<&Value> {
        match self.category.as_ref()? {
            Value::Object(fields) => fields.get("name"),
            other => Some(other),
        }
    }

    /// Resolved category label for exact matching. Only strings are labels.
    pub fn category_label(&self) -> Option<&str> {
        self.category_value().and_then(Value::as_str)
    }

    /// Experience level for exact matching. Only strings count.
    pub fn experience_level_label(&self) -> Option<&str> {
        string_field(&self.experience_level)
    }

    /// Location for exact matching. Only strings count.
    pub fn location_label(&self) -> Option<&str> {
        string_field(&self.location)
    }

    /// The `name` of the owner object, rendered as text.
    pub fn owner_name(&self) -> Option<Cow<'_, str>> {
        self.owner.as_ref()?.get("name").and_then(text_view)
    }

    /// Budget as a float. Missing or non-numeric budgets are `NaN`.
    pub fn budget_value(&self) -> f64 {
        self.budget.as_ref().map_or(f64::NAN, NumberLike::to_f64)
    }

    /// View count; missing or non-numeric counts are 0.
    pub fn view_count(&self) -> i64 {
        self.views.as_ref().and_then(NumberLike::to_i64).unwrap_or(0)
    }

    /// The date used for ordering: `createdAt` unless it is unset, then `date`.
    pub fn sort_date(&self) -> Option<&DateLike> {
        match &self.created_at {
            Some(created) if !created.is_unset() => Some(created),
            _ => self.date.as_ref(),
        }
    }

    /// Parsed ordering date, `None` when missing or unparseable.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        self.sort_date().and_then(DateLike::parse)
    }

    /// Every searchable text field, absent and empty ones skipped, joined by
    /// a space.
    ///
    /// Order: title, description, skills, category label, owner name, location.
    pub fn search_haystack(&self) -> String {
        [
            self.title_text(),
            self.description_text(),
            self.skills_text(),
            self.category_value().and_then(text_view),
            self.owner_name(),
            self.location_text(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}
