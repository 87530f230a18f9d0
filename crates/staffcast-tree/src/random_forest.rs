use crate::decision_tree::{
    count_classes, DecisionTreeClassifier, DecisionTreeRegressor, TreeParams,
};
use crate::error::{ModelError, ModelResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use staffcast_core::Matrix;

/// Forest hyper-parameters.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of columns each tree may split on, in (0, 1].
    pub max_features_ratio: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features_ratio: 1.0,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }

    fn max_features(&self, n_features: usize) -> usize {
        ((n_features as f64 * self.max_features_ratio).ceil() as usize)
            .max(1)
            .min(n_features)
    }
}

/// One tree's bootstrap rows and candidate columns.
///
/// Every tree derives its own rng from `seed + tree index`, so fitting is
/// reproducible however rayon schedules the trees.
fn bag(
    params: &ForestParams,
    tree_index: usize,
    n_rows: usize,
    n_features: usize,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(tree_index as u64));
    let sample: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();

    let max_features = params.max_features(n_features);
    let mut features: Vec<usize> = (0..n_features).collect();
    if max_features < n_features {
        features.shuffle(&mut rng);
        features.truncate(max_features);
    }
    (sample, features)
}

fn validate_fit_input(x: &Matrix, y: &[f64], n_trees: usize) -> ModelResult<()> {
    if n_trees == 0 {
        return Err(ModelError::insufficient("forest needs at least one tree"));
    }
    if x.rows() == 0 {
        return Err(ModelError::insufficient("no training rows"));
    }
    if y.len() != x.rows() {
        return Err(ModelError::insufficient(format!(
            "{} feature rows but {} targets",
            x.rows(),
            y.len()
        )));
    }
    Ok(())
}

/// Bagged ensemble of CART classifiers, aggregated by majority vote.
///
/// Immutable after `fit`; predictions borrow `&self` only.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Fits the ensemble on 0-based class labels.
    ///
    /// Fails fast with `InsufficientTrainingData` on an empty matrix or
    /// single-class targets rather than producing a degenerate model.
    pub fn fit(params: &ForestParams, x: &Matrix, y: &[f64]) -> ModelResult<Self> {
        validate_fit_input(x, y, params.n_trees)?;
        let n_classes = count_classes(y)?;
        let tree_params = params.tree_params();

        let trees: Vec<DecisionTreeClassifier> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                let (sample, features) = bag(params, t, x.rows(), x.cols());
                DecisionTreeClassifier::fit_on(&tree_params, x, y, &sample, &features, n_classes)
            })
            .collect();

        Ok(Self {
            trees,
            n_features: x.cols(),
            n_classes,
        })
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of feature columns the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes seen at fit time.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Majority-vote class label for one row.
    ///
    /// With binary training labels the result is exactly 0.0 or 1.0.
    pub fn predict_row(&self, row: &[f64]) -> ModelResult<f64> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let cls = tree.predict_row(row)?.round() as usize;
            if cls < votes.len() {
                votes[cls] += 1;
            }
        }
        let best = votes
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .map(|(i, _)| i)
            .unwrap_or(0);
        Ok(best as f64)
    }

    /// Majority-vote class labels for every row of a matrix.
    pub fn predict(&self, x: &Matrix) -> ModelResult<Vec<f64>> {
        (0..x.rows())
            .map(|r| self.predict_row(x.row(r)?))
            .collect()
    }
}

/// Bagged ensemble of CART regressors, aggregated by mean.
///
/// Immutable after `fit`; predictions borrow `&self` only.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fits the ensemble on continuous targets.
    pub fn fit(params: &ForestParams, x: &Matrix, y: &[f64]) -> ModelResult<Self> {
        validate_fit_input(x, y, params.n_trees)?;
        let tree_params = params.tree_params();

        let trees: Vec<DecisionTreeRegressor> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                let (sample, features) = bag(params, t, x.rows(), x.cols());
                DecisionTreeRegressor::fit_on(&tree_params, x, y, &sample, &features)
            })
            .collect();

        Ok(Self {
            trees,
            n_features: x.cols(),
        })
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of feature columns the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean prediction over the ensemble for one row.
    pub fn predict_row(&self, row: &[f64]) -> ModelResult<f64> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_row(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Mean predictions for every row of a matrix.
    pub fn predict(&self, x: &Matrix) -> ModelResult<Vec<f64>> {
        (0..x.rows())
            .map(|r| self.predict_row(x.row(r)?))
            .collect()
    }
}
