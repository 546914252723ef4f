//! Inference-only k-means. Centroids are fit offline and loaded from the
//! bundle; this module only assigns points to the nearest one.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansModel {
    centroids: Vec<Vec<f64>>,
}

impl KMeansModel {
    pub fn new(centroids: Vec<Vec<f64>>) -> Result<Self, ModelError> {
        let dim = centroids.first().map(Vec::len).unwrap_or(0);
        let model = Self { centroids };
        model.validate(dim)?;
        Ok(model)
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    pub(crate) fn validate(&self, dim: usize) -> Result<(), ModelError> {
        if self.centroids.is_empty() {
            return Err(ModelError::InvalidBundle(
                "k-means model has no centroids".to_string(),
            ));
        }
        if let Some((idx, centroid)) = self
            .centroids
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != dim)
        {
            return Err(ModelError::InvalidBundle(format!(
                "centroid {idx} has {} dimensions, expected {dim}",
                centroid.len()
            )));
        }
        if self.centroids.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidBundle(
                "centroids must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Index of the nearest centroid; ties go to the lowest index.
    pub fn predict(&self, point: &[f64]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (idx, centroid) in self.centroids.iter().enumerate() {
            let dist = distance_sq(point, centroid);
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        best
    }
}

fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
