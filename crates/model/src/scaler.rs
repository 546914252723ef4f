use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate(scaler.mean.len())?;
        Ok(scaler)
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub(crate) fn validate(&self, dim: usize) -> Result<(), ModelError> {
        if self.mean.len() != dim || self.scale.len() != dim {
            return Err(ModelError::InvalidBundle(format!(
                "scaler has {} means and {} scales, schema has {dim} features",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidBundle(
                "scaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Scale `input`. Zero-variance columns (scale 0) are only centred.
    pub fn transform(&self, input: &[f64]) -> Vec<f64> {
        input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect()
    }
}
