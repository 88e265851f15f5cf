//! Classifiers for fixed-length feature vectors.
//!
//! Both classifiers implement [`Classifier`]: `train` replaces any previous state,
//! `predict` fails with [`Error::Untrained`](crate::Error::Untrained) until `train`
//! has succeeded once.
//!
//! ## Algorithms
//!
//! ### k-Nearest Neighbors
//!
//! A lazy learner: training only stores a copy of the records. At prediction time
//! every stored record is ranked by distance to the query (stable on ties) and the
//! `k` nearest vote; the earliest-ranked label among those with the most votes wins.
//!
//! ### K-Means
//!
//! An unsupervised partitioner: k-means++ seeding followed by Lloyd iterations until
//! no centroid coordinate moves more than the tolerance. `predict` returns the name of
//! the nearest cluster (`"Cluster N"`), not an input label.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use shapetag::{Classifier, FeatureRecord, Knn, Metric};
//!
//! let train = vec![
//!     FeatureRecord::labeled(vec![1.0, 1.0], "A"),
//!     FeatureRecord::labeled(vec![2.0, 2.0], "A"),
//!     FeatureRecord::labeled(vec![3.0, 3.0], "B"),
//!     FeatureRecord::labeled(vec![6.0, 6.0], "B"),
//! ];
//!
//! let mut knn = Knn::new(3, Metric::Euclidean);
//! knn.train(&train).unwrap();
//! let label = knn.predict(&FeatureRecord::unlabeled(vec![1.5, 1.5])).unwrap();
//! assert_eq!(label, "A");
//! ```

mod kmeans;
mod knn;
mod traits;

pub use kmeans::{cluster_name, KMeans};
pub use knn::Knn;
pub use traits::Classifier;
