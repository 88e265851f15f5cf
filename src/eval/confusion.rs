use std::collections::HashMap;
use std::fmt;

use crate::record::FeatureRecord;

/// Actual-vs-predicted label counts over a fixed label set.
///
/// Rows are actual labels, columns predicted labels, both in the order the labels were
/// supplied at construction. Pairs involving a label outside the set are ignored by
/// [`increment`](Self::increment) and reported as `None` by [`get`](Self::get).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major `labels.len() × labels.len()` counts.
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix over `labels` (duplicates are kept once, first occurrence wins).
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            let label = label.into();
            if !index.contains_key(&label) {
                index.insert(label.clone(), ordered.len());
                ordered.push(label);
            }
        }
        let n = ordered.len();
        Self {
            labels: ordered,
            index,
            counts: vec![0; n * n],
        }
    }

    /// Matrix over every label present in `records`, in first-seen order.
    ///
    /// Unlabeled records contribute [`UNKNOWN`](crate::UNKNOWN).
    pub fn from_records(records: &[FeatureRecord]) -> Self {
        Self::new(records.iter().map(|r| r.label_or_unknown().to_string()))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn cell(&self, actual: &str, predicted: &str) -> Option<usize> {
        let row = *self.index.get(actual)?;
        let col = *self.index.get(predicted)?;
        Some(row * self.labels.len() + col)
    }

    /// Record one prediction. Returns `false` (and changes nothing) if either label is
    /// outside the matrix's label set.
    pub fn increment(&mut self, actual: &str, predicted: &str) -> bool {
        match self.cell(actual, predicted) {
            Some(cell) => {
                self.counts[cell] += 1;
                true
            }
            None => false,
        }
    }

    /// Count for `(actual, predicted)`, or `None` if either label is unknown to the matrix.
    pub fn get(&self, actual: &str, predicted: &str) -> Option<u64> {
        self.cell(actual, predicted).map(|cell| self.counts[cell])
    }

    /// Total number of recorded predictions.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn at(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.labels.len() + col]
    }

    /// Correct predictions over all predictions; 0 when nothing has been recorded.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u64 = (0..self.labels.len()).map(|i| self.at(i, i)).sum();
        correct as f64 / total as f64
    }

    /// TP / (TP + FP) for the label at `idx`; 0 when TP is 0.
    fn precision(&self, idx: usize) -> f64 {
        let tp = self.at(idx, idx);
        if tp == 0 {
            return 0.0;
        }
        let column: u64 = (0..self.labels.len()).map(|row| self.at(row, idx)).sum();
        tp as f64 / column as f64
    }

    /// TP / (TP + FN) for the label at `idx`; 0 when TP is 0.
    fn recall(&self, idx: usize) -> f64 {
        let tp = self.at(idx, idx);
        if tp == 0 {
            return 0.0;
        }
        let row: u64 = (0..self.labels.len()).map(|col| self.at(idx, col)).sum();
        tp as f64 / row as f64
    }

    fn macro_mean(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        let n = self.labels.len();
        let sum: f64 = (0..n).map(per_class).sum();
        if sum == 0.0 {
            return 0.0;
        }
        sum / n as f64
    }

    /// Unweighted mean of per-class precision.
    pub fn global_precision(&self) -> f64 {
        self.macro_mean(|idx| self.precision(idx))
    }

    /// Unweighted mean of per-class recall.
    pub fn global_recall(&self) -> f64 {
        self.macro_mean(|idx| self.recall(idx))
    }

    /// Harmonic mean of [`global_precision`](Self::global_precision) and
    /// [`global_recall`](Self::global_recall); 0 when both are 0.
    pub fn global_f1_score(&self) -> f64 {
        let p = self.global_precision();
        let r = self.global_recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A\\P")?;
        for label in &self.labels {
            write!(f, "\t{label}")?;
        }
        writeln!(f)?;
        for (row, label) in self.labels.iter().enumerate() {
            write!(f, "{label}")?;
            for col in 0..self.labels.len() {
                write!(f, "\t{}", self.at(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
