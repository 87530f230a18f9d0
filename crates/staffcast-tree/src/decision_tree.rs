use crate::error::{ModelError, ModelResult};
use staffcast_core::Matrix;

/// A node in a fitted tree.
///
/// Splits reference original column indices, so a tree grown on a
/// feature subset still predicts straight from the full row.
#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: f64,
    },
}

/// Stopping rules shared by both tree kinds.
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

// Row-major access; callers validate indices against the matrix shape
// before growing, so plain indexing holds.
fn at(x: &Matrix, row: usize, col: usize) -> f64 {
    x.data()[row * x.cols() + col]
}

fn validate_training_input(x: &Matrix, y: &[f64]) -> ModelResult<()> {
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

/// Counts classes from 0-based labels; fails when only one is present.
pub(crate) fn count_classes(y: &[f64]) -> ModelResult<usize> {
    let mut max_label = 0usize;
    let mut first = None;
    let mut single = true;
    for &label in y {
        let cls = label.round();
        max_label = max_label.max(cls as usize);
        match first {
            None => first = Some(cls),
            Some(f) if f != cls => single = false,
            Some(_) => {}
        }
    }
    if single {
        return Err(ModelError::insufficient(
            "all targets belong to a single class",
        ));
    }
    Ok(max_label + 1)
}

/// Partitions `indices` by `value <= threshold` on one column.
fn partition(
    x: &Matrix,
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &i in indices {
        if at(x, i, feature) <= threshold {
            left.push(i);
        } else {
            right.push(i);
        }
    }
    (left, right)
}

/// Sorted distinct values of one column over the given rows.
fn distinct_column_values(x: &Matrix, indices: &[usize], feature: usize) -> Vec<f64> {
    let mut values: Vec<f64> = indices.iter().map(|&i| at(x, i, feature)).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

// ─── Classifier ──────────────────────────────────────────────────────────

/// CART classifier splitting on Gini impurity.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    root: TreeNode,
    n_features: usize,
    n_classes: usize,
}

impl DecisionTreeClassifier {
    /// Fits a tree on all rows and all columns.
    ///
    /// Targets are 0-based class labels; fitting fails when the matrix is
    /// empty, the target length differs, or only one class is present.
    pub fn fit(params: &TreeParams, x: &Matrix, y: &[f64]) -> ModelResult<Self> {
        validate_training_input(x, y)?;
        let n_classes = count_classes(y)?;
        let indices: Vec<usize> = (0..x.rows()).collect();
        let features: Vec<usize> = (0..x.cols()).collect();
        Ok(Self::grow(params, x, y, &indices, &features, n_classes))
    }

    /// Fits a tree on chosen rows (repeats allowed) and candidate columns.
    ///
    /// The bagging path: a bootstrap sample may hold a single class, which
    /// simply yields a one-leaf tree inside the ensemble.
    pub(crate) fn fit_on(
        params: &TreeParams,
        x: &Matrix,
        y: &[f64],
        indices: &[usize],
        features: &[usize],
        n_classes: usize,
    ) -> Self {
        Self::grow(params, x, y, indices, features, n_classes)
    }

    fn grow(
        params: &TreeParams,
        x: &Matrix,
        y: &[f64],
        indices: &[usize],
        features: &[usize],
        n_classes: usize,
    ) -> Self {
        let root = build_classifier_node(params, x, y, indices, features, n_classes, 0);
        Self {
            root,
            n_features: x.cols(),
            n_classes,
        }
    }

    /// Number of feature columns the tree was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes seen at fit time.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Predicts the class label for one row.
    pub fn predict_row(&self, row: &[f64]) -> ModelResult<f64> {
        traverse(&self.root, self.n_features, row)
    }

    /// Predicts class labels for every row of a matrix.
    pub fn predict(&self, x: &Matrix) -> ModelResult<Vec<f64>> {
        (0..x.rows())
            .map(|r| self.predict_row(x.row(r)?))
            .collect()
    }
}

fn build_classifier_node(
    params: &TreeParams,
    x: &Matrix,
    y: &[f64],
    indices: &[usize],
    features: &[usize],
    n_classes: usize,
    depth: usize,
) -> TreeNode {
    if depth >= params.max_depth || indices.len() < params.min_samples_split || indices.len() < 2 {
        return TreeNode::Leaf {
            value: majority_class(y, indices, n_classes),
        };
    }

    // Pure node
    let first = y[indices[0]];
    if indices.iter().all(|&i| y[i] == first) {
        return TreeNode::Leaf { value: first };
    }

    let mut best_gini = f64::MAX;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;
    let mut best_left = Vec::new();
    let mut best_right = Vec::new();

    for &feature in features {
        let values = distinct_column_values(x, indices, feature);
        for w in values.windows(2) {
            let threshold = (w[0] + w[1]) / 2.0;
            let (left, right) = partition(x, indices, feature, threshold);
            if left.len() < params.min_samples_leaf || right.len() < params.min_samples_leaf {
                continue;
            }
            let gini = weighted_gini(y, &left, &right, indices.len(), n_classes);
            if gini < best_gini {
                best_gini = gini;
                best_feature = feature;
                best_threshold = threshold;
                best_left = left;
                best_right = right;
            }
        }
    }

    if best_left.is_empty() || best_right.is_empty() {
        return TreeNode::Leaf {
            value: majority_class(y, indices, n_classes),
        };
    }

    let left = build_classifier_node(params, x, y, &best_left, features, n_classes, depth + 1);
    let right = build_classifier_node(params, x, y, &best_right, features, n_classes, depth + 1);
    TreeNode::Split {
        feature: best_feature,
        threshold: best_threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn class_counts(y: &[f64], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes.max(1)];
    for &i in indices {
        let cls = y[i].round() as usize;
        if cls < counts.len() {
            counts[cls] += 1;
        }
    }
    counts
}

fn gini_impurity(y: &[f64], indices: &[usize], n_classes: usize) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let n = indices.len() as f64;
    let mut gini = 1.0;
    for &c in &class_counts(y, indices, n_classes) {
        let p = c as f64 / n;
        gini -= p * p;
    }
    gini
}

fn weighted_gini(
    y: &[f64],
    left: &[usize],
    right: &[usize],
    total: usize,
    n_classes: usize,
) -> f64 {
    let t = total as f64;
    (left.len() as f64 / t) * gini_impurity(y, left, n_classes)
        + (right.len() as f64 / t) * gini_impurity(y, right, n_classes)
}

fn majority_class(y: &[f64], indices: &[usize], n_classes: usize) -> f64 {
    let counts = class_counts(y, indices, n_classes);
    let best = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, &c)| c)
        .map(|(i, _)| i)
        .unwrap_or(0);
    best as f64
}

// ─── Regressor ───────────────────────────────────────────────────────────

/// CART regressor splitting on mean squared error.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    root: TreeNode,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Fits a tree on all rows and all columns.
    pub fn fit(params: &TreeParams, x: &Matrix, y: &[f64]) -> ModelResult<Self> {
        validate_training_input(x, y)?;
        let indices: Vec<usize> = (0..x.rows()).collect();
        let features: Vec<usize> = (0..x.cols()).collect();
        Ok(Self::grow(params, x, y, &indices, &features))
    }

    /// Fits a tree on chosen rows (repeats allowed) and candidate columns.
    pub(crate) fn fit_on(
        params: &TreeParams,
        x: &Matrix,
        y: &[f64],
        indices: &[usize],
        features: &[usize],
    ) -> Self {
        Self::grow(params, x, y, indices, features)
    }

    fn grow(
        params: &TreeParams,
        x: &Matrix,
        y: &[f64],
        indices: &[usize],
        features: &[usize],
    ) -> Self {
        let root = build_regressor_node(params, x, y, indices, features, 0);
        Self {
            root,
            n_features: x.cols(),
        }
    }

    /// Number of feature columns the tree was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predicts the target value for one row.
    pub fn predict_row(&self, row: &[f64]) -> ModelResult<f64> {
        traverse(&self.root, self.n_features, row)
    }

    /// Predicts target values for every row of a matrix.
    pub fn predict(&self, x: &Matrix) -> ModelResult<Vec<f64>> {
        (0..x.rows())
            .map(|r| self.predict_row(x.row(r)?))
            .collect()
    }
}

fn build_regressor_node(
    params: &TreeParams,
    x: &Matrix,
    y: &[f64],
    indices: &[usize],
    features: &[usize],
    depth: usize,
) -> TreeNode {
    if depth >= params.max_depth || indices.len() < params.min_samples_split || indices.len() < 2 {
        return TreeNode::Leaf {
            value: mean_target(y, indices),
        };
    }

    let mut best_mse = f64::MAX;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;
    let mut best_left = Vec::new();
    let mut best_right = Vec::new();

    for &feature in features {
        let values = distinct_column_values(x, indices, feature);
        for w in values.windows(2) {
            let threshold = (w[0] + w[1]) / 2.0;
            let (left, right) = partition(x, indices, feature, threshold);
            if left.len() < params.min_samples_leaf || right.len() < params.min_samples_leaf {
                continue;
            }
            let mse = weighted_mse(y, &left, &right, indices.len());
            if mse < best_mse {
                best_mse = mse;
                best_feature = feature;
                best_threshold = threshold;
                best_left = left;
                best_right = right;
            }
        }
    }

    if best_left.is_empty() || best_right.is_empty() {
        return TreeNode::Leaf {
            value: mean_target(y, indices),
        };
    }

    let left = build_regressor_node(params, x, y, &best_left, features, depth + 1);
    let right = build_regressor_node(params, x, y, &best_right, features, depth + 1);
    TreeNode::Split {
        feature: best_feature,
        threshold: best_threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn mean_target(y: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: f64 = indices.iter().map(|&i| y[i]).sum();
    sum / indices.len() as f64
}

fn mse_around_mean(y: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let mean = mean_target(y, indices);
    let sum: f64 = indices
        .iter()
        .map(|&i| {
            let d = y[i] - mean;
            d * d
        })
        .sum();
    sum / indices.len() as f64
}

fn weighted_mse(y: &[f64], left: &[usize], right: &[usize], total: usize) -> f64 {
    let t = total as f64;
    (left.len() as f64 / t) * mse_around_mean(y, left)
        + (right.len() as f64 / t) * mse_around_mean(y, right)
}

// ─── Shared traversal ────────────────────────────────────────────────────

fn traverse(root: &TreeNode, n_features: usize, row: &[f64]) -> ModelResult<f64> {
    if row.len() != n_features {
        return Err(ModelError::FeatureMismatch {
            expected: n_features,
            got: row.len(),
        });
    }
    let mut node = root;
    loop {
        match node {
            TreeNode::Leaf { value } => return Ok(*value),
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                node = if row[*feature] <= *threshold {
                    left
                } else {
                    right
                };
            }
        }
    }
}
