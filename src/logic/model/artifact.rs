//! Persisted model artifacts
//!
//! Scaler and classifier are exported offline as JSON documents tagged by `kind`.
//! Everything is shape-checked here so the request path never sees a bad model.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::classifier::{
    Classifier, DecisionTree, LinearModel, LinearSvc, LogisticRegression, TreeEnsemble,
};
use super::scaler::{MinMaxScaler, Scaler, StandardScaler};
use super::ArtifactError;
use crate::logic::features::layout::{check_feature_names, FEATURE_LAYOUT};

// ============================================================================
// SCALER ARTIFACT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl ScalerArtifact {
    pub fn build(self) -> Result<Arc<dyn Scaler>, ArtifactError> {
        match self {
            ScalerArtifact::Standard { feature_names, mean, scale } => {
                check_names(feature_names.as_deref())?;
                Ok(Arc::new(StandardScaler::new(mean, scale)?))
            }
            ScalerArtifact::MinMax { feature_names, min, scale } => {
                check_names(feature_names.as_deref())?;
                Ok(Arc::new(MinMaxScaler::new(min, scale)?))
            }
        }
    }
}

// ============================================================================
// CLASSIFIER ARTIFACT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeModelSpec {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub tree: TreeSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSpec {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<TreeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LinearSpec),
    LinearSvc(LinearSpec),
    DecisionTree(TreeModelSpec),
    RandomForest(ForestSpec),
}

impl TreeSpec {
    fn build(self, n_features: usize, n_classes: usize) -> Result<DecisionTree, ArtifactError> {
        DecisionTree::new(
            self.children_left,
            self.children_right,
            self.feature,
            self.threshold,
            self.value,
            n_features,
            n_classes,
        )
    }
}

impl ClassifierArtifact {
    /// Capability is fixed here: tree ensembles and logistic regression are
    /// probabilistic, linear SVC is label-only.
    pub fn build(self) -> Result<Classifier, ArtifactError> {
        match self {
            ClassifierArtifact::LogisticRegression(spec) => {
                check_names(spec.feature_names.as_deref())?;
                let linear = LinearModel::new(spec.coef, spec.intercept, spec.classes)?;
                Ok(Classifier::Probabilistic(Arc::new(LogisticRegression::new(linear))))
            }
            ClassifierArtifact::LinearSvc(spec) => {
                check_names(spec.feature_names.as_deref())?;
                let linear = LinearModel::new(spec.coef, spec.intercept, spec.classes)?;
                Ok(Classifier::Point(Arc::new(LinearSvc::new(linear))))
            }
            ClassifierArtifact::DecisionTree(spec) => {
                check_names(spec.feature_names.as_deref())?;
                let tree = spec.tree.build(spec.n_features, spec.classes.len())?;
                let model = TreeEnsemble::single(tree, spec.classes, spec.n_features)?;
                Ok(Classifier::Probabilistic(Arc::new(model)))
            }
            ClassifierArtifact::RandomForest(spec) => {
                check_names(spec.feature_names.as_deref())?;
                let n_classes = spec.classes.len();
                let trees = spec
                    .trees
                    .into_iter()
                    .map(|t| t.build(spec.n_features, n_classes))
                    .collect::<Result<Vec<_>, _>>()?;
                let model = TreeEnsemble::forest(trees, spec.classes, spec.n_features)?;
                Ok(Classifier::Probabilistic(Arc::new(model)))
            }
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn check_names(names: Option<&[String]>) -> Result<(), ArtifactError> {
    match names {
        Some(names) => check_feature_names(names).map_err(|position| ArtifactError::LayoutMismatch {
            position,
            expected: FEATURE_LAYOUT.get(position).map(|s| s.to_string()),
            found: names.get(position).cloned(),
        }),
        None => Ok(()),
    }
}

/// Read and parse a JSON artifact from disk
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_scaler(path: &Path) -> Result<Arc<dyn Scaler>, ArtifactError> {
    read_artifact::<ScalerArtifact>(path)?.build()
}

pub fn load_classifier(path: &Path) -> Result<Classifier, ArtifactError> {
    read_artifact::<ClassifierArtifact>(path)?.build()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scaler_artifact_parses() {
        let artifact: ScalerArtifact = serde_json::from_value(json!({
            "kind": "standard",
            "mean": [0.0, 1.0],
            "scale": [1.0, 2.0]
        }))
        .unwrap();
        let scaler = artifact.build().unwrap();
        assert_eq!(scaler.kind(), "standard");
        assert_eq!(scaler.transform(&[1.0, 3.0]).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_feature_names_must_match_layout() {
        let artifact: ScalerArtifact = serde_json::from_value(json!({
            "kind": "min_max",
            "feature_names": ["humidity", "temperature", "smoke", "temp_max", "temp_min", "wind_speed", "wind_gust"],
            "min": vec![0.0; 7],
            "scale": vec![1.0; 7]
        }))
        .unwrap();
        match artifact.build() {
            Err(ArtifactError::LayoutMismatch { position, expected, found }) => {
                assert_eq!(position, 0);
                assert_eq!(expected.as_deref(), Some("temperature"));
                assert_eq!(found.as_deref(), Some("humidity"));
            }
            other => panic!("expected layout mismatch, got {:?}", other.map(|s| s.kind())),
        }
    }

    #[test]
    fn test_classifier_capability_selected_by_kind() {
        let linear = json!({
            "classes": [0, 1, 2],
            "coef": [[1.0], [0.0], [-1.0]],
            "intercept": [0.0, 0.0, 0.0]
        });

        let mut lr = linear.clone();
        lr["kind"] = json!("logistic_regression");
        let classifier = serde_json::from_value::<ClassifierArtifact>(lr).unwrap().build().unwrap();
        assert!(classifier.has_probabilities());

        let mut svc = linear;
        svc["kind"] = json!("linear_svc");
        let classifier = serde_json::from_value::<ClassifierArtifact>(svc).unwrap().build().unwrap();
        assert!(!classifier.has_probabilities());
        assert_eq!(classifier.kind(), "linear_svc");
    }

    #[test]
    fn test_random_forest_artifact() {
        let artifact: ClassifierArtifact = serde_json::from_value(json!({
            "kind": "random_forest",
            "n_features": 1,
            "classes": [0, 1],
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [10.0, -2.0, -2.0],
                "value": [[5.0, 5.0], [4.0, 1.0], [1.0, 4.0]]
            }]
        }))
        .unwrap();
        let classifier = artifact.build().unwrap();
        assert_eq!(classifier.kind(), "random_forest");
        assert_eq!(classifier.predict(&[20.0]).unwrap(), 1);
        assert_eq!(classifier.predict_proba(&[1.0]).unwrap(), Some(vec![0.8, 0.2]));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let parsed = serde_json::from_value::<ClassifierArtifact>(json!({"kind": "xgboost"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_read_artifact_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_scaler(&missing), Err(ArtifactError::Io { .. })));

        let garbage = dir.path().join("scaler.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(load_scaler(&garbage), Err(ArtifactError::Parse { .. })));
    }
}
