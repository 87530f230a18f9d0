//! Shared matrix and error scaffolding for the StaffCast workspace.

pub mod error;
pub mod matrix;

pub use error::{CoreError, CoreResult};
pub use matrix::Matrix;
