//! Classifiers
//!
//! Two capabilities: every classifier predicts a label, some also produce a
//! class distribution. Which one a model has is decided once, when the
//! artifact is loaded, and carried by the `Classifier` enum.

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};

use super::{ArtifactError, ModelError};

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Label-only classifier
pub trait PointClassifier: Send + Sync {
    fn kind(&self) -> &'static str;
    fn n_features(&self) -> usize;
    /// Class labels, indexed the same way as probability columns
    fn classes(&self) -> &[i64];
    fn predict(&self, input: &[f64]) -> Result<i64, ModelError>;
}

/// Classifier that also exposes a probability per class
pub trait ProbabilisticClassifier: PointClassifier {
    fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Classifier selected at load time
#[derive(Clone)]
pub enum Classifier {
    Point(Arc<dyn PointClassifier>),
    Probabilistic(Arc<dyn ProbabilisticClassifier>),
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Point(c) => c.kind(),
            Classifier::Probabilistic(c) => c.kind(),
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::Point(c) => c.n_features(),
            Classifier::Probabilistic(c) => c.n_features(),
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::Point(c) => c.classes(),
            Classifier::Probabilistic(c) => c.classes(),
        }
    }

    pub fn has_probabilities(&self) -> bool {
        matches!(self, Classifier::Probabilistic(_))
    }

    pub fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        match self {
            Classifier::Point(c) => c.predict(input),
            Classifier::Probabilistic(c) => c.predict(input),
        }
    }

    /// `None` for label-only models
    pub fn predict_proba(&self, input: &[f64]) -> Result<Option<Vec<f64>>, ModelError> {
        match self {
            Classifier::Point(_) => Ok(None),
            Classifier::Probabilistic(c) => c.predict_proba(input).map(Some),
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("kind", &self.kind())
            .field("probabilistic", &self.has_probabilities())
            .field("classes", &self.classes())
            .finish()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn check_len(expected: usize, input: &[f64]) -> Result<(), ModelError> {
    if input.len() != expected {
        return Err(ModelError::DimensionMismatch {
            stage: "classifier",
            expected,
            actual: input.len(),
        });
    }
    Ok(())
}

fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn label_at(classes: &[i64], index: Option<usize>) -> Result<i64, ModelError> {
    index
        .and_then(|i| classes.get(i).copied())
        .ok_or_else(|| ModelError::Numeric("classifier produced no usable score".to_string()))
}

fn softmax(scores: &Array1<f64>) -> Vec<f64> {
    let max = scores.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp = scores.mapv(|s| (s - max).exp());
    let sum = exp.sum();
    (exp / sum).to_vec()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn check_classes(classes: &[i64]) -> Result<(), ArtifactError> {
    if classes.len() < 2 {
        return Err(ArtifactError::Invalid(format!(
            "classifier needs at least 2 classes, got {}",
            classes.len()
        )));
    }
    Ok(())
}

// ============================================================================
// LINEAR MODELS
// ============================================================================

/// Coefficients shared by logistic regression and linear SVC.
///
/// Binary models carry a single row that scores the second class.
#[derive(Debug, Clone)]
pub struct LinearModel {
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
}

impl LinearModel {
    pub fn new(
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        classes: Vec<i64>,
    ) -> Result<Self, ArtifactError> {
        check_classes(&classes)?;

        let rows = coef.len();
        let cols = coef.first().map(Vec::len).unwrap_or(0);
        if cols == 0 || coef.iter().any(|row| row.len() != cols) {
            return Err(ArtifactError::Invalid("coef must be a non-empty rectangular matrix".to_string()));
        }

        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if rows != expected_rows {
            return Err(ArtifactError::Invalid(format!(
                "coef has {} rows, expected {} for {} classes",
                rows,
                expected_rows,
                classes.len()
            )));
        }
        if intercept.len() != rows {
            return Err(ArtifactError::Invalid(format!(
                "intercept has {} entries, expected {}",
                intercept.len(),
                rows
            )));
        }

        let flat: Vec<f64> = coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| ArtifactError::Invalid(format!("coef shape: {}", e)))?;

        Ok(Self {
            coef,
            intercept: Array1::from(intercept),
            classes,
        })
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn decision_function(&self, input: &[f64]) -> Result<Array1<f64>, ModelError> {
        check_len(self.n_features(), input)?;
        Ok(self.coef.dot(&ArrayView1::from(input)) + &self.intercept)
    }

    fn is_binary(&self) -> bool {
        self.coef.nrows() == 1
    }
}

/// Multinomial logistic regression (sigmoid for the binary case)
#[derive(Debug, Clone)]
pub struct LogisticRegression(LinearModel);

impl LogisticRegression {
    pub fn new(model: LinearModel) -> Self {
        Self(model)
    }
}

impl PointClassifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn classes(&self) -> &[i64] {
        &self.0.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(input)?;
        label_at(&self.0.classes, argmax(&proba))
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        let scores = self.0.decision_function(input)?;
        if self.0.is_binary() {
            let p = sigmoid(scores[0]);
            return Ok(vec![1.0 - p, p]);
        }
        Ok(softmax(&scores))
    }
}

/// Linear support vector classifier. Label only.
#[derive(Debug, Clone)]
pub struct LinearSvc(LinearModel);

impl LinearSvc {
    pub fn new(model: LinearModel) -> Self {
        Self(model)
    }
}

impl PointClassifier for LinearSvc {
    fn kind(&self) -> &'static str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn classes(&self) -> &[i64] {
        &self.0.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let scores = self.0.decision_function(input)?;
        if self.0.is_binary() {
            let index = if scores[0] > 0.0 { 1 } else { 0 };
            return label_at(&self.0.classes, Some(index));
        }
        label_at(&self.0.classes, argmax(scores.as_slice().unwrap_or(&[])))
    }
}

// ============================================================================
// TREE MODELS
// ============================================================================

/// Leaf marker in `children_left` / `children_right`
const LEAF: i64 = -1;

/// Flattened binary decision tree: node `i` goes left when `x[feature[i]] <= threshold[i]`.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<usize>,
    threshold: Vec<f64>,
    /// Per-node class weights, normalized at load
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<Vec<f64>>,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ArtifactError> {
        let nodes = children_left.len();
        if nodes == 0 {
            return Err(ArtifactError::Invalid("decision tree has no nodes".to_string()));
        }
        if [children_right.len(), feature.len(), threshold.len(), value.len()]
            .iter()
            .any(|&len| len != nodes)
        {
            return Err(ArtifactError::Invalid("decision tree arrays differ in length".to_string()));
        }

        let mut features = Vec::with_capacity(nodes);
        for i in 0..nodes {
            let (left, right) = (children_left[i], children_right[i]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(ArtifactError::Invalid(format!("node {} has a single child", i)));
                }
                features.push(0);
                continue;
            }

            // Children must point forward so traversal always terminates.
            let valid = |child: i64| child > i as i64 && (child as usize) < nodes;
            if !valid(left) || !valid(right) {
                return Err(ArtifactError::Invalid(format!("node {} has out-of-range children", i)));
            }
            let f = usize::try_from(feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    ArtifactError::Invalid(format!("node {} splits on unknown feature {}", i, feature[i]))
                })?;
            features.push(f);
        }

        let mut normalized = Vec::with_capacity(nodes);
        for (i, weights) in value.into_iter().enumerate() {
            if weights.len() != n_classes {
                return Err(ArtifactError::Invalid(format!(
                    "node {} has {} class weights, expected {}",
                    i,
                    weights.len(),
                    n_classes
                )));
            }
            let total: f64 = weights.iter().sum();
            normalized.push(if total > 0.0 {
                weights.iter().map(|w| w / total).collect()
            } else {
                vec![1.0 / n_classes as f64; n_classes]
            });
        }

        Ok(Self {
            children_left,
            children_right,
            feature: features,
            threshold,
            value: normalized,
        })
    }

    fn leaf_distribution(&self, input: &[f64]) -> &[f64] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            node = if input[self.feature[node]] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }
}

/// One or more trees whose leaf distributions are averaged
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    kind: &'static str,
    trees: Vec<DecisionTree>,
    classes: Vec<i64>,
    n_features: usize,
}

impl TreeEnsemble {
    pub fn single(tree: DecisionTree, classes: Vec<i64>, n_features: usize) -> Result<Self, ArtifactError> {
        check_classes(&classes)?;
        Ok(Self {
            kind: "decision_tree",
            trees: vec![tree],
            classes,
            n_features,
        })
    }

    pub fn forest(trees: Vec<DecisionTree>, classes: Vec<i64>, n_features: usize) -> Result<Self, ArtifactError> {
        check_classes(&classes)?;
        if trees.is_empty() {
            return Err(ArtifactError::Invalid("random forest has no trees".to_string()));
        }
        Ok(Self {
            kind: "random_forest",
            trees,
            classes,
            n_features,
        })
    }
}

impl PointClassifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(input)?;
        label_at(&self.classes, argmax(&proba))
    }
}

impl ProbabilisticClassifier for TreeEnsemble {
    fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_len(self.n_features, input)?;
        let mut sum = Array1::<f64>::zeros(self.classes.len());
        for tree in &self.trees {
            sum += &ArrayView1::from(tree.leaf_distribution(input));
        }
        Ok((sum / self.trees.len() as f64).to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================
