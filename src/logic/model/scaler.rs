//! Feature Scalers
//!
//! Pre-fitted affine transforms applied to the feature vector before inference.
//! Parameters come from the scaler artifact and never change after load.

use ndarray::{Array1, ArrayView1};

use super::{ArtifactError, ModelError};

/// Scaler capability consumed by the pipeline
pub trait Scaler: Send + Sync {
    fn kind(&self) -> &'static str;
    fn n_features(&self) -> usize;
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

fn check_len(expected: usize, input: &[f64]) -> Result<(), ModelError> {
    if input.len() != expected {
        return Err(ModelError::DimensionMismatch {
            stage: "scaler",
            expected,
            actual: input.len(),
        });
    }
    Ok(())
}

fn paired(
    name: &str,
    first: Vec<f64>,
    second: Vec<f64>,
) -> Result<(Array1<f64>, Array1<f64>), ArtifactError> {
    if first.len() != second.len() {
        return Err(ArtifactError::Invalid(format!(
            "{} scaler parameters differ in length ({} vs {})",
            name,
            first.len(),
            second.len()
        )));
    }
    if first.iter().chain(second.iter()).any(|v| !v.is_finite()) {
        return Err(ArtifactError::Invalid(format!(
            "{} scaler parameters must be finite",
            name
        )));
    }
    Ok((Array1::from(first), Array1::from(second)))
}

// ============================================================================
// STANDARD SCALER
// ============================================================================

/// `(x - mean) / scale`
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Zero scale entries (constant training columns) are treated as 1.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let (mean, mut scale) = paired("standard", mean, scale)?;
        scale.mapv_inplace(|s| if s == 0.0 { 1.0 } else { s });
        Ok(Self { mean, scale })
    }
}

impl Scaler for StandardScaler {
    fn kind(&self) -> &'static str {
        "standard"
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_len(self.n_features(), input)?;
        let x = ArrayView1::from(input);
        Ok(((&x - &self.mean) / &self.scale).to_vec())
    }
}

// ============================================================================
// MIN-MAX SCALER
// ============================================================================

/// `x * scale + min`, with `scale`/`min` as fitted (already folded with the target range)
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let (min, scale) = paired("min_max", min, scale)?;
        Ok(Self { min, scale })
    }
}

impl Scaler for MinMaxScaler {
    fn kind(&self) -> &'static str {
        "min_max"
    }

    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_len(self.n_features(), input)?;
        let x = ArrayView1::from(input);
        Ok((&x * &self.scale + &self.min).to_vec())
    }
}

// ============================================================================
// TESTS
// ============================================================================
