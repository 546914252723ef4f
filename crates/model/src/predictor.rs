use features::{FeatureSchema, FeatureValue, FeatureVector};

use crate::bundle::TrainedModelBundle;
use crate::error::ModelError;

pub type ClusterId = usize;

/// Uniform `predict(vector) -> cluster` contract over whichever model
/// variant is loaded.
///
/// Implementations are read-only after construction and may be called
/// concurrently.
pub trait ClusterPredictor: Send + Sync {
    /// Column order vectors must be built with.
    fn schema(&self) -> &FeatureSchema;

    fn n_clusters(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<ClusterId, ModelError>;
}

/// Encode → scale → nearest centroid, backed by a [`TrainedModelBundle`].
#[derive(Debug, Clone)]
pub struct KMeansPredictor {
    bundle: TrainedModelBundle,
}

impl KMeansPredictor {
    pub fn new(bundle: TrainedModelBundle) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &TrainedModelBundle {
        &self.bundle
    }

    /// Numeric row before scaling. Categorical slots are replaced by their
    /// encoder index.
    pub fn encode(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let schema = self.bundle.schema();
        if !features.features().eq(schema.iter()) {
            return Err(ModelError::SchemaMismatch(format!(
                "expected {} features in bundle order, got {}",
                schema.len(),
                features.len()
            )));
        }

        features
            .slots()
            .iter()
            .map(|(feature, value)| match (feature.is_categorical(), value) {
                (false, FeatureValue::Number(number)) => Ok(*number),
                (true, FeatureValue::Category(label)) => {
                    let encoder = self.bundle.encoder(*feature).ok_or_else(|| {
                        ModelError::SchemaMismatch(format!("no encoder for '{feature}'"))
                    })?;
                    encoder
                        .transform(label)
                        .map(|idx| idx as f64)
                        .ok_or_else(|| ModelError::UnknownCategory {
                            feature: feature.name().to_string(),
                            value: label.clone(),
                            known: encoder.classes().to_vec(),
                        })
                }
                _ => Err(ModelError::SchemaMismatch(format!(
                    "slot '{feature}' holds the wrong value kind"
                ))),
            })
            .collect()
    }
}

impl ClusterPredictor for KMeansPredictor {
    fn schema(&self) -> &FeatureSchema {
        self.bundle.schema()
    }

    fn n_clusters(&self) -> usize {
        self.bundle.kmeans().n_clusters()
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClusterId, ModelError> {
        let encoded = self.encode(features)?;
        let scaled = self.bundle.scaler().transform(&encoded);
        let cluster = self.bundle.kmeans().predict(&scaled);
        tracing::trace!(cluster, "assigned cluster");
        Ok(cluster)
    }
}
