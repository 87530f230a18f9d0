//! Ensemble-of-trees models for StaffCast.
//!
//! CART decision trees and bagged random forests, deterministic under a
//! fixed seed: each tree derives its own rng from the base seed and its
//! index, so parallel fitting reproduces the same ensemble every run.

pub mod decision_tree;
pub mod error;
pub mod random_forest;

pub use decision_tree::{DecisionTreeClassifier, DecisionTreeRegressor, TreeParams};
pub use error::{ModelError, ModelResult};
pub use random_forest::{ForestParams, RandomForestClassifier, RandomForestRegressor};
