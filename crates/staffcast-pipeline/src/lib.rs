//! The fit-once StaffCast pipeline.
//!
//! `Pipeline::fit` runs load, encode, scale and train exactly once per
//! process; the resulting [`FittedPipeline`] is immutable and serves
//! every later prediction and chart request read-only.

pub mod features;
pub mod pipeline;
pub mod summary;

pub use features::{
    feature_row_for_record, feature_row_for_request, PredictionRequest, FEATURE_COLUMNS,
    MISSING_HIRE_YEAR, N_FEATURES,
};
pub use pipeline::{
    FittedPipeline, Pipeline, PipelineConfig, PipelineError, PipelineResult, Prediction,
};
pub use summary::{DepartmentSummary, FitReport};
