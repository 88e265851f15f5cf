//! Feature records: one shape-descriptor signature plus its provenance.

use std::fmt;

use crate::entity::entity_name;

/// Placeholder printed (and used as a vote key) for absent metadata.
pub const UNKNOWN: &str = "Unknown";

/// An immutable feature vector with an optional class label and provenance metadata.
///
/// `method` names the descriptor family the vector was computed with (e.g. `E34`),
/// `sample` identifies the sample within its class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRecord {
    values: Vec<f64>,
    label: Option<String>,
    method: Option<String>,
    sample: Option<String>,
}

impl FeatureRecord {
    /// Create a record with every field set explicitly.
    pub fn new(
        values: Vec<f64>,
        label: Option<String>,
        method: Option<String>,
        sample: Option<String>,
    ) -> Self {
        Self {
            values,
            label,
            method,
            sample,
        }
    }

    /// Create a labeled record without provenance metadata.
    pub fn labeled(values: Vec<f64>, label: impl Into<String>) -> Self {
        Self::new(values, Some(label.into()), None, None)
    }

    /// Create an unlabeled record, typically a query point.
    pub fn unlabeled(values: Vec<f64>) -> Self {
        Self::new(values, None, None, None)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label, or [`UNKNOWN`] when absent.
    pub fn label_or_unknown(&self) -> &str {
        self.label().unwrap_or(UNKNOWN)
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    /// A copy carrying `values` in place of this record's vector; metadata is kept unchanged.
    pub fn with_values(&self, values: Vec<f64>) -> Self {
        Self {
            values,
            label: self.label.clone(),
            method: self.method.clone(),
            sample: self.sample.clone(),
        }
    }
}

impl AsRef<[f64]> for FeatureRecord {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Method : {}, Label : {} ({}), Sample : {}",
            self.method().unwrap_or(UNKNOWN),
            self.label_or_unknown(),
            entity_name(self.label_or_unknown()),
            self.sample().unwrap_or(UNKNOWN),
        )?;
        if self.values.is_empty() {
            return writeln!(f, "No vector data available");
        }
        let joined = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "{joined}")
    }
}
