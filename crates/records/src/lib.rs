//! # Records Crate
//!
//! The listing model shared by the search/filter/sort pipeline and the
//! background worker.
//!
//! ## Main Components
//!
//! - **types**: `ListRecord`, which keeps every field as received
//! - **values**: lenient number and date parsing for loosely typed fields
//! - **loader**: decode record batches from JSON text or files
//! - **error**: error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use records::load_records;
//! use std::path::Path;
//!
//! let records = load_records(Path::new("fixtures/jobs.json"))?;
//! for record in &records {
//!     println!("{:?} budget={}", record.title_text(), record.budget_value());
//! }
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod values;

// Re-export commonly used types for convenience
pub use error::{RecordsError, Result};
pub use loader::{load_records, parse_records, records_from_value};
pub use types::ListRecord;
pub use values::{DateLike, NumberLike, parse_date, parse_float, parse_int, text_view};
