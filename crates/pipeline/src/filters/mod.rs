//! Filter implementations for the listing pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod budget;
pub mod exact_match;
pub mod text_search;

// Re-export for convenience
pub use budget::{BudgetBound, BudgetFilter};
pub use exact_match::{ExactMatchFilter, MatchField};
pub use text_search::{SearchScope, TextSearchFilter};
