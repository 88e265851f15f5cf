use crate::error::{Error, Result};
use crate::record::FeatureRecord;

/// Min-max rescale every value of every record into `[min, max]`.
///
/// The bounds come from the global minimum and maximum over all values of all records,
/// so relative scale between coordinates is preserved. If every value is identical the
/// output is filled with `(min + max) / 2`. Labels and metadata are copied unchanged.
pub fn normalize(records: &[FeatureRecord], min: f64, max: f64) -> Result<Vec<FeatureRecord>> {
    if min > max {
        return Err(Error::InvalidParameter {
            name: "min",
            message: "must not exceed max",
        });
    }
    Ok(rescale(records, min, max))
}

/// [`normalize`] into `[0, 1]`.
pub fn normalize_unit(records: &[FeatureRecord]) -> Vec<FeatureRecord> {
    rescale(records, 0.0, 1.0)
}

fn rescale(records: &[FeatureRecord], min: f64, max: f64) -> Vec<FeatureRecord> {
    let (lo, hi) = records
        .iter()
        .flat_map(|r| r.values().iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;

    records
        .iter()
        .map(|r| {
            let values = r
                .values()
                .iter()
                .map(|&v| {
                    if span > 0.0 {
                        min + (v - lo) * (max - min) / span
                    } else {
                        (min + max) / 2.0
                    }
                })
                .collect();
            r.with_values(values)
        })
        .collect()
}
