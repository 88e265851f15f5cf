//! k-Nearest Neighbors classification.

use tracing::{debug, trace, warn};

use super::traits::Classifier;
use crate::distance::Metric;
use crate::error::{Error, Result};
use crate::record::FeatureRecord;

/// k-Nearest Neighbors classifier.
///
/// Training stores a copy of the records and does nothing else; all work happens in
/// [`predict`](Classifier::predict) and [`get_neighbors`](Knn::get_neighbors).
#[derive(Debug, Clone)]
pub struct Knn {
    /// Number of neighbors that vote.
    k: usize,
    metric: Metric,
    training: Option<Vec<FeatureRecord>>,
}

impl Knn {
    /// Create a KNN classifier voting over the `k` nearest records.
    ///
    /// A Minkowski order below 1 is clamped to 1. Unrecognized metric names are
    /// accepted and degrade to "every candidate is equally far".
    pub fn new(k: usize, metric: impl Into<Metric>) -> Self {
        Self {
            k,
            metric: metric.into().with_valid_norm(),
            training: None,
        }
    }

    /// Create a KNN classifier using the Minkowski distance of order `p` (clamped to `>= 1`).
    pub fn minkowski(k: usize, p: i32) -> Self {
        Self::new(k, Metric::Minkowski(p))
    }

    /// Set the number of voting neighbors.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// The stored training set, if trained.
    pub fn training_set(&self) -> Option<&[FeatureRecord]> {
        self.training.as_deref()
    }

    /// All training records, nearest first.
    ///
    /// Records at equal distance keep their training-set order.
    pub fn get_neighbors(&self, record: &FeatureRecord) -> Result<Vec<&FeatureRecord>> {
        let training = self.training.as_deref().ok_or(Error::Untrained)?;
        let ranked = self.rank(training, record)?;
        Ok(ranked.into_iter().map(|(_, idx)| &training[idx]).collect())
    }

    /// The `limit` nearest training records (fewer if the training set is smaller).
    pub fn get_neighbors_limited(
        &self,
        record: &FeatureRecord,
        limit: usize,
    ) -> Result<Vec<&FeatureRecord>> {
        if limit < 1 {
            return Err(Error::InvalidParameter {
                name: "limit",
                message: "must be at least 1",
            });
        }
        let mut neighbors = self.get_neighbors(record)?;
        neighbors.truncate(limit);
        Ok(neighbors)
    }

    /// `(distance, training index)` pairs sorted ascending by distance.
    fn rank(&self, training: &[FeatureRecord], record: &FeatureRecord) -> Result<Vec<(f64, usize)>> {
        if !self.metric.is_recognized() {
            warn!(
                metric = self.metric.name(),
                "unknown distance metric, defaulting to maximum distance"
            );
        }

        let mut ranked = training
            .iter()
            .enumerate()
            .map(|(idx, candidate)| Ok((self.metric.distance(candidate, record)?, idx)))
            .collect::<Result<Vec<_>>>()?;

        // `sort_by` is stable: equal distances stay in insertion order.
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        trace!(candidates = ranked.len(), "ranked training records by distance");
        Ok(ranked)
    }
}

/// Label with the most votes; among equal counts, the one seen first wins.
fn majority_vote<'a>(neighbors: &[&'a FeatureRecord]) -> Option<(&'a str, usize)> {
    let mut tally: Vec<(&'a str, usize)> = Vec::new();
    for neighbor in neighbors {
        let label = neighbor.label_or_unknown();
        match tally.iter_mut().find(|(seen, _)| *seen == label) {
            Some(entry) => entry.1 += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for &(label, count) in &tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }
    best
}

impl Classifier for Knn {
    fn train(&mut self, records: &[FeatureRecord]) -> Result<()> {
        self.training = None;
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        debug!(samples = records.len(), k = self.k, metric = %self.metric, "training KNN classifier");
        self.training = Some(records.to_vec());
        Ok(())
    }

    fn predict(&self, record: &FeatureRecord) -> Result<String> {
        let neighbors = self.get_neighbors(record)?;
        let nearest = &neighbors[..self.k.min(neighbors.len())];

        let (label, votes) = majority_vote(nearest).ok_or(Error::EmptyInput)?;
        debug!(label, votes, "selected majority label");
        Ok(label.to_string())
    }
}
