//! K-Means clustering exposed through the [`Classifier`] contract.
//!
//! Seeding follows k-means++ with centroid draws weighted by distance to the nearest
//! already-chosen centroid. Refinement is plain Lloyd: assign, re-average, repeat until
//! no centroid coordinate moves by more than the tolerance (or the iteration cap is hit).
//!
//! A bucket that ends an assignment step empty gets a fresh centroid drawn uniformly from
//! the training set. This is counted (see [`KMeans::empty_cluster_reseeds`]) and logged,
//! not reported as an error.

use rand::prelude::*;
use tracing::{debug, info, warn};

use super::traits::Classifier;
use crate::distance::{squared_euclidean, Metric};
use crate::error::{Error, Result};
use crate::record::FeatureRecord;

const DEFAULT_TOLERANCE: f64 = 1e-6;
const DEFAULT_MAX_ITER: usize = 300;

/// Synthetic label of the cluster at `index`.
pub fn cluster_name(index: usize) -> String {
    format!("Cluster {index}")
}

/// K-Means classifier (k-means++ seeding, Lloyd iterations).
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters.
    k: usize,
    metric: Metric,
    /// Largest per-coordinate centroid shift still considered converged.
    tolerance: f64,
    max_iter: usize,
    rng: StdRng,
    fit: Option<Fit>,
}

#[derive(Debug, Clone)]
struct Fit {
    centroids: Vec<FeatureRecord>,
    buckets: Vec<Vec<FeatureRecord>>,
    iterations: usize,
    empty_reseeds: usize,
}

impl KMeans {
    /// Create a K-Means classifier with `k` clusters.
    ///
    /// The random source is seeded from the thread RNG; use [`with_seed`](Self::with_seed)
    /// for reproducible runs.
    pub fn new(k: usize, metric: impl Into<Metric>) -> Self {
        Self {
            k,
            metric: metric.into().with_valid_norm(),
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            rng: StdRng::from_rng(&mut rand::rng()),
            fit: None,
        }
    }

    /// Create a K-Means classifier using the Minkowski distance of order `p` (clamped to `>= 1`).
    pub fn minkowski(k: usize, p: i32) -> Self {
        Self::new(k, Metric::Minkowski(p))
    }

    /// Seed the random source used for seeding and empty-cluster recovery.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set the convergence tolerance (max per-coordinate centroid shift).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the safety cap on Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Learned centroids, one per cluster, labeled `"Cluster N"`.
    pub fn centroids(&self) -> Option<&[FeatureRecord]> {
        self.fit.as_ref().map(|fit| fit.centroids.as_slice())
    }

    /// Training records grouped by cluster; parallel to [`centroids`](Self::centroids).
    pub fn buckets(&self) -> Option<&[Vec<FeatureRecord>]> {
        self.fit.as_ref().map(|fit| fit.buckets.as_slice())
    }

    /// Lloyd iterations run by the last `train` (0 if untrained).
    pub fn iterations(&self) -> usize {
        self.fit.as_ref().map_or(0, |fit| fit.iterations)
    }

    /// How many times the last `train` reseeded an empty cluster (0 if untrained).
    pub fn empty_cluster_reseeds(&self) -> usize {
        self.fit.as_ref().map_or(0, |fit| fit.empty_reseeds)
    }

    /// Index of the cluster whose centroid is nearest to `record`.
    pub fn predict_index(&self, record: &FeatureRecord) -> Result<usize> {
        let fit = self.fit.as_ref().ok_or(Error::Untrained)?;
        nearest_centroid(&self.metric, record, &fit.centroids)
    }

    /// Sum over all clusters of the squared Euclidean distance from each member to its centroid.
    ///
    /// Always Euclidean, whatever metric the clustering used.
    pub fn calculate_sse(&self) -> Result<f64> {
        let fit = self.fit.as_ref().ok_or(Error::Untrained)?;
        Ok(fit
            .buckets
            .iter()
            .zip(fit.centroids.iter())
            .map(|(bucket, centroid)| {
                bucket
                    .iter()
                    .map(|r| squared_euclidean(r.values(), centroid.values()))
                    .sum::<f64>()
            })
            .sum())
    }

    /// Mean silhouette coefficient over all clustered records, in `[-1, 1]`.
    ///
    /// For each record, `a` is the mean Euclidean distance to the other members of its
    /// cluster (0 for a singleton) and `b` the smallest mean distance to the members of
    /// any other non-empty cluster; the record scores `(b - a) / max(a, b)`. A record
    /// scores 0 when no other cluster is populated or when `a` and `b` are both 0.
    ///
    /// Returns `NaN` if no records are clustered.
    pub fn calculate_silhouette_score(&self) -> Result<f64> {
        let fit = self.fit.as_ref().ok_or(Error::Untrained)?;
        let buckets = &fit.buckets;

        let mut total = 0.0;
        let mut count = 0usize;
        for (own, bucket) in buckets.iter().enumerate() {
            for (i, record) in bucket.iter().enumerate() {
                let a = if bucket.len() > 1 {
                    let sum: f64 = bucket
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, other)| squared_euclidean(record.values(), other.values()).sqrt())
                        .sum();
                    sum / (bucket.len() - 1) as f64
                } else {
                    0.0
                };

                let b = buckets
                    .iter()
                    .enumerate()
                    .filter(|(other, members)| *other != own && !members.is_empty())
                    .map(|(_, members)| mean_distance(record, members))
                    .fold(f64::INFINITY, f64::min);

                let score = if b.is_infinite() || a.max(b) == 0.0 {
                    0.0
                } else {
                    (b - a) / a.max(b)
                };
                total += score;
                count += 1;
            }
        }

        if count == 0 {
            return Ok(f64::NAN);
        }
        Ok(total / count as f64)
    }

    /// k-means++: the first centroid is uniform, each later one is drawn with probability
    /// proportional to its distance from the nearest centroid chosen so far.
    fn seed_centroids(&mut self, records: &[FeatureRecord]) -> Result<Vec<Vec<f64>>> {
        let n = records.len();
        let first = self.rng.random_range(0..n);
        let mut chosen = vec![first];
        let mut nearest = records
            .iter()
            .map(|r| self.metric.distance(r, &records[first]))
            .collect::<Result<Vec<f64>>>()?;

        while chosen.len() < self.k {
            let total: f64 = nearest.iter().sum();
            let next = if total.is_finite() && total > 0.0 {
                let target = self.rng.random::<f64>() * total;
                let mut cumulative = 0.0;
                // Rounding can leave `target` just past the last cumulative sum.
                let mut pick = nearest.iter().rposition(|&d| d > 0.0).unwrap_or(n - 1);
                for (idx, &d) in nearest.iter().enumerate() {
                    cumulative += d;
                    if cumulative > target {
                        pick = idx;
                        break;
                    }
                }
                pick
            } else {
                // All remaining mass is zero (duplicates) or unbounded: fall back to uniform.
                self.rng.random_range(0..n)
            };
            chosen.push(next);

            for (idx, record) in records.iter().enumerate() {
                let d = self.metric.distance(record, &records[next])?;
                if d < nearest[idx] {
                    nearest[idx] = d;
                }
            }
        }

        Ok(chosen
            .into_iter()
            .map(|idx| records[idx].values().to_vec())
            .collect())
    }

    fn assign(
        &self,
        records: &[FeatureRecord],
        centroids: &[FeatureRecord],
    ) -> Result<Vec<Vec<FeatureRecord>>> {
        let mut buckets = vec![Vec::new(); centroids.len()];
        for record in records {
            let idx = nearest_centroid(&self.metric, record, centroids)?;
            buckets[idx].push(record.clone());
        }
        Ok(buckets)
    }
}

/// First centroid index achieving the minimum distance.
fn nearest_centroid(
    metric: &Metric,
    record: &FeatureRecord,
    centroids: &[FeatureRecord],
) -> Result<usize> {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = metric.distance(record, centroid)?;
        if d < best_dist {
            best = idx;
            best_dist = d;
        }
    }
    Ok(best)
}

fn mean_distance(record: &FeatureRecord, members: &[FeatureRecord]) -> f64 {
    let sum: f64 = members
        .iter()
        .map(|m| squared_euclidean(record.values(), m.values()).sqrt())
        .sum();
    sum / members.len() as f64
}

fn mean(bucket: &[FeatureRecord], dim: usize) -> Vec<f64> {
    let mut sum = vec![0.0; dim];
    for record in bucket {
        for (acc, v) in sum.iter_mut().zip(record.values()) {
            *acc += v;
        }
    }
    let n = bucket.len() as f64;
    sum.into_iter().map(|s| s / n).collect()
}

fn centroid(index: usize, values: Vec<f64>) -> FeatureRecord {
    FeatureRecord::new(values, Some(cluster_name(index)), None, None)
}

/// Largest absolute per-coordinate difference between matching centroids.
fn max_shift(old: &[FeatureRecord], new: &[FeatureRecord]) -> f64 {
    old.iter()
        .zip(new.iter())
        .flat_map(|(a, b)| a.values().iter().zip(b.values()).map(|(x, y)| (x - y).abs()))
        .fold(0.0, f64::max)
}

impl Classifier for KMeans {
    fn train(&mut self, records: &[FeatureRecord]) -> Result<()> {
        self.fit = None;
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        let Some(first) = records.first() else {
            return Err(Error::EmptyInput);
        };
        let dim = first.dim();
        for record in records.iter().skip(1) {
            if record.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: record.dim(),
                });
            }
        }

        let mut centroids: Vec<FeatureRecord> = self
            .seed_centroids(records)?
            .into_iter()
            .enumerate()
            .map(|(idx, values)| centroid(idx, values))
            .collect();

        let mut iterations = 0;
        let mut empty_reseeds = 0;
        loop {
            iterations += 1;
            let buckets = self.assign(records, &centroids)?;

            let mut next = Vec::with_capacity(self.k);
            for (idx, bucket) in buckets.iter().enumerate() {
                let values = if bucket.is_empty() {
                    empty_reseeds += 1;
                    warn!(
                        cluster = idx,
                        iteration = iterations,
                        "empty cluster, reseeding centroid from a random training record"
                    );
                    records[self.rng.random_range(0..records.len())]
                        .values()
                        .to_vec()
                } else {
                    mean(bucket, dim)
                };
                next.push(centroid(idx, values));
            }

            let shift = max_shift(&centroids, &next);
            debug!(iteration = iterations, shift, "lloyd iteration");
            centroids = next;

            if shift <= self.tolerance {
                info!(iterations, k = self.k, "k-means converged");
                break;
            }
            if iterations >= self.max_iter {
                warn!(
                    iterations,
                    shift, "k-means stopped at the iteration cap before converging"
                );
                break;
            }
        }

        let buckets = self.assign(records, &centroids)?;
        self.fit = Some(Fit {
            centroids,
            buckets,
            iterations,
            empty_reseeds,
        });
        Ok(())
    }

    /// Name of the nearest cluster, e.g. `"Cluster 2"`.
    fn predict(&self, record: &FeatureRecord) -> Result<String> {
        self.predict_index(record).map(cluster_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_points() -> Vec<FeatureRecord> {
        vec![
            FeatureRecord::labeled(vec![1.0, 2.0], "Label1"),
            FeatureRecord::labeled(vec![3.0, 4.0], "Label2"),
            FeatureRecord::labeled(vec![5.0, 6.0], "Label3"),
            FeatureRecord::labeled(vec![7.0, 8.0], "Label4"),
        ]
    }

    fn two_blobs() -> Vec<FeatureRecord> {
        let mut data = Vec::new();
        for (x, y) in [(0.0, 0.0), (0.1, 0.2), (0.2, 0.1), (-0.1, 0.1)] {
            data.push(FeatureRecord::labeled(vec![x, y], "near"));
        }
        for (x, y) in [(10.0, 10.0), (10.1, 9.9), (9.9, 10.1), (10.2, 10.2)] {
            data.push(FeatureRecord::labeled(vec![x, y], "far"));
        }
        data
    }

    #[test]
    fn predict_before_train_fails() {
        let km = KMeans::new(3, Metric::Euclidean);
        let input = FeatureRecord::unlabeled(vec![1.0, 1.0]);
        assert!(matches!(km.predict(&input), Err(Error::Untrained)));
        assert!(matches!(km.calculate_sse(), Err(Error::Untrained)));
        assert!(matches!(km.calculate_silhouette_score(), Err(Error::Untrained)));
        assert!(km.centroids().is_none());
    }

    #[test]
    fn training_yields_k_buckets_partitioning_the_data() {
        let mut km = KMeans::new(3, Metric::Euclidean).with_seed(42);
        km.train(&four_points()).unwrap();

        let buckets = km.buckets().unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(km.centroids().unwrap().len(), 3);
        assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), 4);
        for point in four_points() {
            let hits = buckets
                .iter()
                .filter(|b| b.iter().any(|r| r.values() == point.values()))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn predict_names_a_cluster() {
        let mut km = KMeans::new(3, Metric::Euclidean).with_seed(1);
        km.train(&four_points()).unwrap();
        let label = km.predict(&FeatureRecord::unlabeled(vec![2.0, 3.0])).unwrap();
        assert!(label.starts_with("Cluster "));
        let idx = km.predict_index(&FeatureRecord::unlabeled(vec![2.0, 3.0])).unwrap();
        assert_eq!(label, cluster_name(idx));
        assert!(idx < 3);
    }

    #[test]
    fn centroids_carry_cluster_labels() {
        let mut km = KMeans::new(2, Metric::Manhattan).with_seed(3);
        km.train(&two_blobs()).unwrap();
        let centroids = km.centroids().unwrap();
        assert_eq!(centroids[0].label(), Some("Cluster 0"));
        assert_eq!(centroids[1].label(), Some("Cluster 1"));
        assert!(centroids.iter().all(|c| c.method().is_none() && c.sample().is_none()));
    }

    #[test]
    fn duplicate_points_leave_empty_clusters() {
        let data = vec![
            FeatureRecord::labeled(vec![1.0, 2.0], "Label1"),
            FeatureRecord::labeled(vec![1.0, 2.0], "Label2"),
        ];
        let mut km = KMeans::new(3, Metric::Euclidean).with_seed(7);
        km.train(&data).unwrap();

        let buckets = km.buckets().unwrap();
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().any(Vec::is_empty));
        assert!(km.empty_cluster_reseeds() > 0);
        assert_eq!(km.calculate_sse().unwrap(), 0.0);
    }

    #[test]
    fn sse_and_silhouette_bounds() {
        for seed in 0..10 {
            let mut km = KMeans::new(3, Metric::Euclidean).with_seed(seed);
            km.train(&four_points()).unwrap();
            assert!(km.calculate_sse().unwrap() >= 0.0);
            let s = km.calculate_silhouette_score().unwrap();
            assert!((-1.0..=1.0).contains(&s), "silhouette {s} out of range");
        }
    }

    #[test]
    fn single_cluster_centroid_is_the_mean() {
        let data = vec![
            FeatureRecord::unlabeled(vec![0.0, 0.0]),
            FeatureRecord::unlabeled(vec![2.0, 0.0]),
            FeatureRecord::unlabeled(vec![0.0, 2.0]),
            FeatureRecord::unlabeled(vec![2.0, 2.0]),
        ];
        let mut km = KMeans::new(1, Metric::Euclidean).with_seed(0);
        km.train(&data).unwrap();
        assert_eq!(km.centroids().unwrap()[0].values(), &[1.0, 1.0]);
        assert!((km.calculate_sse().unwrap() - 8.0).abs() < 1e-12);
        // No other populated cluster: every record scores 0.
        assert_eq!(km.calculate_silhouette_score().unwrap(), 0.0);
    }

    #[test]
    fn separates_well_separated_blobs() {
        for seed in 0..5 {
            let mut km = KMeans::new(2, Metric::Euclidean).with_seed(seed);
            let data = two_blobs();
            km.train(&data).unwrap();

            let labels: Vec<usize> = data.iter().map(|r| km.predict_index(r).unwrap()).collect();
            assert!(labels[..4].iter().all(|&l| l == labels[0]));
            assert!(labels[4..].iter().all(|&l| l == labels[4]));
            assert_ne!(labels[0], labels[4]);

            assert!(km.calculate_silhouette_score().unwrap() > 0.9);
            assert!(km.calculate_sse().unwrap() < 0.5);
        }
    }

    #[test]
    fn silhouette_known_value() {
        let data: Vec<FeatureRecord> = [0.0, 1.0, 10.0, 11.0]
            .iter()
            .map(|&x| FeatureRecord::unlabeled(vec![x]))
            .collect();
        let mut km = KMeans::new(2, Metric::Euclidean).with_seed(11);
        km.train(&data).unwrap();

        let expected = (9.5 / 10.5 + 8.5 / 9.5) / 2.0;
        assert!((km.calculate_silhouette_score().unwrap() - expected).abs() < 1e-9);
        assert!((km.calculate_sse().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_centroids() {
        let mut a = KMeans::new(2, Metric::Euclidean).with_seed(99);
        let mut b = KMeans::new(2, Metric::Euclidean).with_seed(99);
        a.train(&four_points()).unwrap();
        b.train(&four_points()).unwrap();
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.iterations(), b.iterations());
    }

    #[test]
    fn iteration_cap_stops_training() {
        let mut km = KMeans::new(2, Metric::Euclidean)
            .with_seed(5)
            .with_tolerance(0.0)
            .with_max_iter(1);
        km.train(&two_blobs()).unwrap();
        assert_eq!(km.iterations(), 1);
        assert_eq!(km.buckets().unwrap().iter().map(Vec::len).sum::<usize>(), 8);
    }

    #[test]
    fn unrecognized_metric_collapses_into_first_cluster() {
        let mut km = KMeans::new(2, "invalid_metric").with_seed(0);
        km.train(&two_blobs()).unwrap();
        let buckets = km.buckets().unwrap();
        assert_eq!(buckets[0].len(), 8);
        assert!(buckets[1].is_empty());
        assert_eq!(
            km.predict(&FeatureRecord::unlabeled(vec![5.0, 5.0])).unwrap(),
            "Cluster 0"
        );
    }

    #[test]
    fn invalid_training_inputs() {
        let mut km = KMeans::new(0, Metric::Euclidean);
        assert!(matches!(
            km.train(&four_points()),
            Err(Error::InvalidParameter { name: "k", .. })
        ));

        let mut km = KMeans::new(2, Metric::Euclidean);
        assert!(matches!(km.train(&[]), Err(Error::EmptyInput)));

        let ragged = vec![
            FeatureRecord::unlabeled(vec![1.0, 2.0]),
            FeatureRecord::unlabeled(vec![1.0]),
        ];
        assert!(matches!(
            km.train(&ragged),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn retraining_replaces_clusters() {
        let mut km = KMeans::new(2, Metric::Euclidean).with_seed(4);
        km.train(&two_blobs()).unwrap();
        km.train(&four_points()).unwrap();
        assert_eq!(km.buckets().unwrap().iter().map(Vec::len).sum::<usize>(), 4);
    }
}
