//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a batch of listing records.

use anyhow::Result;
use records::ListRecord;

/// Core trait for filtering listing records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// A filter carries its own criterion (search term, label, bound) and only
/// ever removes records; it never reorders or edits them.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a batch of records.
    ///
    /// # Arguments
    /// * `records` - The records to filter (takes ownership)
    ///
    /// # Returns
    /// * `Ok(Vec<ListRecord>)` - The surviving records, in input order
    /// * `Err` - If filtering fails
    fn apply(&self, records: Vec<ListRecord>) -> Result<Vec<ListRecord>>;
}
