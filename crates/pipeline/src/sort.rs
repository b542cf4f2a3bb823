//! Ordering of filtered records.
//!
//! Sorting always runs after filtering. Keys are extracted once per record and
//! the sort is stable, so records with equal keys keep their relative order.

use chrono::{DateTime, Utc};
use records::ListRecord;
use std::cmp::Ordering;

/// Which key to order by. Unknown `sortBy` values map to `Unsorted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Budget,
    Title,
    Views,
    Unsorted,
}

impl SortField {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "date" => SortField::Date,
            "budget" => SortField::Budget,
            "title" => SortField::Title,
            "views" => SortField::Views,
            _ => SortField::Unsorted,
        }
    }
}

/// `"asc"` is ascending; every other value is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_wire(value: &str) -> Self {
        if value == "asc" {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sorts a batch by one field in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorter {
    field: SortField,
    direction: SortDirection,
}

impl Sorter {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn field(&self) -> SortField {
        self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Sort the batch and return it.
    ///
    /// ## Keys
    /// - `Date`: parsed `createdAt` (or `date`). Unparseable dates go last in
    ///   both directions and tie with each other.
    /// - `Budget`: float budget, `NaN` counted as 0.
    /// - `Title`: lowercased title, missing counted as "".
    /// - `Views`: integer view count, missing counted as 0.
    /// - `Unsorted`: input order is kept.
    pub fn sort(&self, records: Vec<ListRecord>) -> Vec<ListRecord> {
        let direction = self.direction;
        match self.field {
            SortField::Date => sort_keyed(records, ListRecord::parsed_date, |a, b| {
                compare_dates(a, b, direction)
            }),
            SortField::Budget => sort_keyed(records, budget_key, |a, b| {
                direction.orient(a.partial_cmp(b).unwrap_or(Ordering::Equal))
            }),
            SortField::Title => sort_keyed(records, title_key, |a, b| direction.orient(a.cmp(b))),
            SortField::Views => sort_keyed(records, ListRecord::view_count, |a, b| {
                direction.orient(a.cmp(b))
            }),
            SortField::Unsorted => records,
        }
    }
}

fn budget_key(record: &ListRecord) -> f64 {
    let budget = record.budget_value();
    if budget.is_nan() { 0.0 } else { budget }
}

fn title_key(record: &ListRecord) -> String {
    record
        .title_text()
        .map(|title| title.to_lowercase())
        .unwrap_or_default()
}

/// Parseable dates compare chronologically; any parseable date sorts before
/// an unparseable one regardless of direction.
fn compare_dates(
    a: &Option<DateTime<Utc>>,
    b: &Option<DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.orient(a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Decorate, stable-sort, undecorate.
fn sort_keyed<K, F, C>(records: Vec<ListRecord>, key: F, compare: C) -> Vec<ListRecord>
where
    F: Fn(&ListRecord) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut keyed: Vec<(K, ListRecord)> = records
        .into_iter()
        .map(|record| (key(&record), record))
        .collect();
    keyed.sort_by(|a, b| compare(&a.0, &b.0));
    keyed.into_iter().map(|(_, record)| record).collect()
}
