//! The three operations the list processor exposes.
//!
//! All three take ownership of the caller's batch and hand back a new
//! sequence. None of them edit a record.

use anyhow::Result;
use records::ListRecord;
use tracing::debug;

use crate::criteria::FilterCriteria;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{SearchScope, TextSearchFilter};
use crate::sort::Sorter;
use crate::traits::Filter;

/// Filter a batch by the criteria, then sort it.
///
/// Sorting runs even when no filter is active; with an unrecognized
/// `sortBy` it leaves the order alone.
pub fn search_and_filter(
    records: Vec<ListRecord>,
    criteria: &FilterCriteria,
) -> Result<Vec<ListRecord>> {
    let input_count = records.len();
    let pipeline = FilterPipeline::from_criteria(criteria);
    let filtered = pipeline.apply(records)?;

    let sorter = Sorter::new(criteria.sort_field(), criteria.sort_direction());
    let sorted = sorter.sort(filtered);

    debug!(
        input_count,
        output_count = sorted.len(),
        sort_field = ?sorter.field(),
        sort_direction = ?sorter.direction(),
        "search_and_filter complete"
    );
    Ok(sorted)
}

/// Keep records whose title, description or skills contain the term.
///
/// An empty or missing term returns the batch untouched.
pub fn search_posts(records: Vec<ListRecord>, search_term: Option<&str>) -> Result<Vec<ListRecord>> {
    match search_term.filter(|term| !term.is_empty()) {
        Some(term) => {
            TextSearchFilter::new(term, SearchScope::TitleDescriptionSkills).apply(records)
        }
        None => Ok(records),
    }
}

/// Identity passthrough: every record is kept whatever the filters say.
///
/// No field filtering is defined for posts, so the filters are ignored.
pub fn filter_posts<F: ?Sized>(records: Vec<ListRecord>, _filters: &F) -> Vec<ListRecord> {
    records
}
