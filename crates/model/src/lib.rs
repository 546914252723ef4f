//! Inference-only cluster prediction for the food recommendation service.
//!
//! The clustering model, feature scaler and label encoders are trained
//! offline and exported as one JSON [`TrainedModelBundle`]. At runtime the
//! bundle is loaded once and wrapped in a [`KMeansPredictor`], which callers
//! use through the [`ClusterPredictor`] trait so they never depend on the
//! concrete model variant.
//!
//! Prediction applies, in order: label encoding of categorical slots,
//! standard scaling, nearest-centroid assignment.

pub mod bundle;
pub mod encoder;
pub mod error;
pub mod kmeans;
pub mod predictor;
pub mod scaler;

pub use bundle::{TrainedModelBundle, BUNDLE_VERSION};
pub use encoder::LabelEncoder;
pub use error::ModelError;
pub use kmeans::KMeansModel;
pub use predictor::{ClusterId, ClusterPredictor, KMeansPredictor};
pub use scaler::StandardScaler;
