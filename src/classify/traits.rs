use crate::error::Result;
use crate::record::FeatureRecord;

/// Common train/predict contract shared by every classifier.
pub trait Classifier {
    /// Fit on `records`, replacing any previous training state.
    fn train(&mut self, records: &[FeatureRecord]) -> Result<()>;

    /// Predict a label for `record`.
    ///
    /// Fails with [`Error::Untrained`](crate::Error::Untrained) if [`train`](Self::train)
    /// has never succeeded on this instance.
    fn predict(&self, record: &FeatureRecord) -> Result<String>;
}
