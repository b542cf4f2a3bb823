//! Search, filter and sort of marketplace listings.
//!
//! This crate provides:
//! - FilterCriteria, the declarative request for one batch
//! - Filter trait and implementations (text search, exact labels, budget)
//! - FilterPipeline for composing filters
//! - Sorter for the final ordering
//! - The three list operations: `search_and_filter`, `search_posts`,
//!   `filter_posts`
//!
//! ## Architecture
//! A batch is processed in stages:
//! 1. Filters remove records that fail an active criterion, in a fixed order
//! 2. The Sorter orders what is left (always runs, possibly as a no-op)
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterCriteria, search_and_filter};
//!
//! let criteria = FilterCriteria::default()
//!     .with_search_term("logo")
//!     .with_budget_min("100")
//!     .with_sort("date", "desc");
//!
//! let result = search_and_filter(records, &criteria)?;
//! ```

pub mod criteria;
pub mod filter_pipeline;
pub mod filters;
pub mod operations;
pub mod sort;
pub mod traits;

// Re-export main types
pub use criteria::{ALL_SENTINEL, FilterCriteria};
pub use filter_pipeline::FilterPipeline;
pub use operations::{filter_posts, search_and_filter, search_posts};
pub use sort::{SortDirection, SortField, Sorter};
pub use traits::Filter;
