//! Classification of shape-descriptor signatures.
//!
//! `shapetag` classifies fixed-length feature vectors into labeled categories and scores
//! the result:
//! - distance metrics (Euclidean, Manhattan, Minkowski) in [`distance`]
//! - a k-nearest-neighbors classifier and a k-means (k-means++ seeding, Lloyd
//!   iterations) classifier in [`classify`]
//! - confusion-matrix scoring, k-fold and leave-one-out cross-validation, and min-max
//!   normalization in [`eval`]
//! - a loader for one-vector-per-file signature folders in [`loader`]

#![forbid(unsafe_code)]

pub mod classify;
pub mod distance;
pub mod entity;
pub mod error;
pub mod eval;
pub mod loader;
pub mod record;

pub use classify::{cluster_name, Classifier, KMeans, Knn};
pub use distance::{euclidean, manhattan, minkowski, Metric};
pub use error::{Error, Result};
pub use eval::ConfusionMatrix;
pub use record::{FeatureRecord, UNKNOWN};
