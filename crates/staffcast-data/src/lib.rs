//! HR dataset loading for StaffCast.
//!
//! Reads the employee CSV, derives the hire-year, country and attrition
//! columns, and draws the deterministic training sample.

pub mod loader;
pub mod schema;

pub use loader::{load_csv, read_records, LoadError, LoadOptions, LoadResult};
pub use schema::{derive_attrition, derive_country, parse_hire_year, RawRecord, Record};
