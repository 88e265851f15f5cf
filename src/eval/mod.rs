//! Scoring and evaluation harness.
//!
//! - [`ConfusionMatrix`]: actual-vs-predicted counts with accuracy and macro-averaged
//!   precision, recall, and F1.
//! - [`create_k_folds`], [`perform_k_fold`], [`perform_loocv`], [`loocv_accuracy`]:
//!   cross-validation over any [`Classifier`](crate::Classifier).
//! - [`normalize`]: min-max rescaling applied before evaluation.
//!
//! ## Usage
//!
//! ```rust
//! use shapetag::eval::{perform_loocv, ConfusionMatrix};
//! use shapetag::{FeatureRecord, Knn, Metric};
//!
//! let data = vec![
//!     FeatureRecord::labeled(vec![0.0, 0.0], "A"),
//!     FeatureRecord::labeled(vec![0.1, 0.1], "A"),
//!     FeatureRecord::labeled(vec![5.0, 5.0], "B"),
//!     FeatureRecord::labeled(vec![5.1, 5.1], "B"),
//! ];
//!
//! let mut knn = Knn::new(1, Metric::Euclidean);
//! let mut matrix = ConfusionMatrix::from_records(&data);
//! perform_loocv(&data, &mut knn, &mut matrix).unwrap();
//! assert_eq!(matrix.accuracy(), 1.0);
//! ```

mod confusion;
mod cross_validation;
mod normalize;

pub use confusion::ConfusionMatrix;
pub use cross_validation::{create_k_folds, loocv_accuracy, perform_k_fold, perform_loocv};
pub use normalize::{normalize, normalize_unit};
