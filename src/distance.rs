//! Distance metrics between feature vectors.
//!
//! All functions accept anything viewable as `&[f64]` (slices, `Vec<f64>`,
//! [`FeatureRecord`](crate::FeatureRecord)) and reject inputs of unequal length.
//!
//! ```text
//! euclidean(a, b)    = sqrt(Σ (a_i - b_i)²)
//! manhattan(a, b)    = Σ |a_i - b_i|
//! minkowski(a, b, p) = (Σ |a_i - b_i|^p)^(1/p)
//! ```
//!
//! `minkowski(a, b, 1)` coincides with `manhattan` and `minkowski(a, b, 2)` with `euclidean`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Distance selector used by the classifiers.
///
/// Names that do not match a known metric are kept as [`Metric::Unrecognized`]; every
/// distance computed with it is `f64::MAX`, so all candidates tie and ordering falls
/// back to insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    Euclidean,
    Manhattan,
    /// Minkowski distance with the given order of the norm.
    Minkowski(i32),
    Unrecognized(String),
}

impl Metric {
    /// Compute the distance between `a` and `b` under this metric.
    pub fn distance(&self, a: impl AsRef<[f64]>, b: impl AsRef<[f64]>) -> Result<f64> {
        match self {
            Metric::Euclidean => euclidean(a, b),
            Metric::Manhattan => manhattan(a, b),
            Metric::Minkowski(p) => minkowski(a, b, *p),
            Metric::Unrecognized(_) => Ok(f64::MAX),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Metric::Unrecognized(_))
    }

    /// Clamp a Minkowski order below 1 up to 1; other metrics are returned unchanged.
    pub(crate) fn with_valid_norm(self) -> Self {
        match self {
            Metric::Minkowski(p) => Metric::Minkowski(p.max(1)),
            other => other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Minkowski(_) => "minkowski",
            Metric::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for Metric {
    /// `"minkowski"` without an explicit order maps to `Minkowski(1)`.
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "euclidean" => Metric::Euclidean,
            "manhattan" => Metric::Manhattan,
            "minkowski" => Metric::Minkowski(1),
            _ => Metric::Unrecognized(name.to_string()),
        }
    }
}

impl FromStr for Metric {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Metric::from(s))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Minkowski(p) => write!(f, "minkowski(p={p})"),
            other => f.write_str(other.name()),
        }
    }
}

#[inline]
fn check_dims(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean (L2) distance.
pub fn euclidean(a: impl AsRef<[f64]>, b: impl AsRef<[f64]>) -> Result<f64> {
    let (a, b) = (a.as_ref(), b.as_ref());
    check_dims(a, b)?;
    Ok(squared_euclidean(a, b).sqrt())
}

/// Manhattan (L1) distance.
pub fn manhattan(a: impl AsRef<[f64]>, b: impl AsRef<[f64]>) -> Result<f64> {
    let (a, b) = (a.as_ref(), b.as_ref());
    check_dims(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum())
}

/// Minkowski distance of order `p`.
///
/// Returns [`Error::InvalidNormOrder`] when `p <= 0`.
pub fn minkowski(a: impl AsRef<[f64]>, b: impl AsRef<[f64]>, p: i32) -> Result<f64> {
    if p <= 0 {
        return Err(Error::InvalidNormOrder(p));
    }
    let (a, b) = (a.as_ref(), b.as_ref());
    check_dims(a, b)?;
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().powi(p))
        .sum();
    Ok(sum.powf(1.0 / f64::from(p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureRecord;

    const EPS: f64 = 1e-12;

    #[test]
    fn euclidean_known_value() {
        let d = euclidean([0.0, 0.0], [3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < EPS);
    }

    #[test]
    fn manhattan_known_value() {
        let d = manhattan([1.0, -2.0, 3.0], [4.0, 2.0, 3.0]).unwrap();
        assert!((d - 7.0).abs() < EPS);
    }

    #[test]
    fn minkowski_order_one_equals_manhattan() {
        let a = [1.5, -2.0, 7.25];
        let b = [0.5, 3.0, -1.0];
        let m1 = minkowski(a, b, 1).unwrap();
        let l1 = manhattan(a, b).unwrap();
        assert!((m1 - l1).abs() < EPS);
    }

    #[test]
    fn minkowski_order_two_equals_euclidean() {
        let a = [1.0, 2.0];
        let b = [4.0, 6.0];
        assert!((minkowski(a, b, 2).unwrap() - euclidean(a, b).unwrap()).abs() < EPS);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = vec![0.3, -4.0, 12.5];
        assert_eq!(euclidean(&a, &a).unwrap(), 0.0);
        assert_eq!(manhattan(&a, &a).unwrap(), 0.0);
        assert_eq!(minkowski(&a, &a, 3).unwrap(), 0.0);
    }

    #[test]
    fn empty_vectors_are_zero_apart() {
        let empty: [f64; 0] = [];
        assert_eq!(euclidean(empty, empty).unwrap(), 0.0);
        assert_eq!(manhattan(empty, empty).unwrap(), 0.0);
        assert_eq!(minkowski(empty, empty, 2).unwrap(), 0.0);
    }

    #[test]
    fn minkowski_rejects_non_positive_order() {
        for p in [0, -1, -7] {
            let err = minkowski([1.0], [2.0], p).unwrap_err();
            assert!(matches!(err, Error::InvalidNormOrder(q) if q == p));
        }
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let a = [1.0, 2.0];
        let b = [1.0, 2.0, 3.0];
        for err in [
            euclidean(a, b).unwrap_err(),
            manhattan(a, b).unwrap_err(),
            minkowski(a, b, 2).unwrap_err(),
        ] {
            assert!(matches!(
                err,
                Error::DimensionMismatch {
                    expected: 2,
                    found: 3
                }
            ));
            assert_eq!(err.to_string(), "dimension mismatch: expected 2, found 3");
        }
    }

    #[test]
    fn works_on_feature_records() {
        let a = FeatureRecord::labeled(vec![1.0, 1.0], "A");
        let b = FeatureRecord::unlabeled(vec![4.0, 5.0]);
        assert!((euclidean(&a, &b).unwrap() - 5.0).abs() < EPS);
        assert!((Metric::Manhattan.distance(&a, &b).unwrap() - 7.0).abs() < EPS);
    }

    #[test]
    fn metric_from_name() {
        assert_eq!(Metric::from("euclidean"), Metric::Euclidean);
        assert_eq!(Metric::from("MANHATTAN"), Metric::Manhattan);
        assert_eq!(Metric::from("Minkowski"), Metric::Minkowski(1));
        assert_eq!(
            "chebyshev".parse::<Metric>().unwrap(),
            Metric::Unrecognized("chebyshev".into())
        );
    }

    #[test]
    fn unrecognized_metric_yields_max_distance() {
        let metric = Metric::from("invalid_metric");
        assert!(!metric.is_recognized());
        assert_eq!(metric.distance([0.0], [100.0]).unwrap(), f64::MAX);
        // No dimension check either: the selector never looks at the vectors.
        assert_eq!(metric.distance([0.0], [1.0, 2.0]).unwrap(), f64::MAX);
    }
}
