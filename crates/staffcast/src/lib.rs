//! # StaffCast
//!
//! An HR attrition and salary prediction pipeline in Rust.
//!
//! ## Modules
//!
//! - **core** — shared `Matrix` type and error scaffolding
//! - **data** — employee CSV schema, derived columns, deterministic sampling
//! - **preprocessing** — per-field category codecs and standard scaling
//! - **tree** — CART decision trees and bagged random forests
//! - **metrics** — accuracy, MSE, RMSE, R² for the fit report
//! - **pipeline** — the fit-once pipeline and its prediction surface
//!
//! ```no_run
//! use staffcast::pipeline::{Pipeline, PipelineConfig, PredictionRequest};
//!
//! # fn main() -> Result<(), staffcast::pipeline::PipelineError> {
//! let fitted = Pipeline::new(PipelineConfig::default()).fit_csv("employees.csv")?;
//! let prediction = fitted.predict(&PredictionRequest {
//!     department: "Engineering".into(),
//!     job_title: "Developer".into(),
//!     work_mode: "Remote".into(),
//!     location: "Bangalore, India".into(),
//!     country: "India".into(),
//!     experience_years: 5,
//!     performance_rating: 3,
//!     hire_year: 2020,
//! })?;
//! println!("{prediction:?}");
//! # Ok(())
//! # }
//! ```

/// Shared matrix and errors.
pub use staffcast_core as core;

/// Dataset schema and loading.
pub use staffcast_data as data;

/// Codecs and scalers.
pub use staffcast_preprocessing as preprocessing;

/// Tree ensembles.
pub use staffcast_tree as tree;

/// Fit-quality metrics.
pub use staffcast_metrics as metrics;

/// The fit-once pipeline.
pub use staffcast_pipeline as pipeline;
