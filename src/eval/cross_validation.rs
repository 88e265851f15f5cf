use rand::prelude::*;
use tracing::debug;

use super::confusion::ConfusionMatrix;
use crate::classify::Classifier;
use crate::entity::entity_name;
use crate::error::{Error, Result};
use crate::record::FeatureRecord;

/// Shuffle `dataset` and deal it round-robin into `k` folds.
///
/// Fold sizes differ by at most one; with `k > dataset.len()` the trailing folds are empty.
pub fn create_k_folds<R: Rng + ?Sized>(
    dataset: &[FeatureRecord],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Vec<FeatureRecord>>> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be at least 1",
        });
    }

    let mut shuffled = dataset.to_vec();
    shuffled.shuffle(rng);

    let mut folds: Vec<Vec<FeatureRecord>> = vec![Vec::with_capacity(dataset.len() / k + 1); k];
    for (i, record) in shuffled.into_iter().enumerate() {
        folds[i % k].push(record);
    }
    Ok(folds)
}

/// Leave-One-Out Cross-Validation: for each record, retrain on every other record and
/// record `(actual, predicted)` in `matrix`.
///
/// Retrains `classifier` once per record. Pairs whose labels fall outside the matrix's
/// label set are dropped by the matrix.
pub fn perform_loocv<C: Classifier + ?Sized>(
    dataset: &[FeatureRecord],
    classifier: &mut C,
    matrix: &mut ConfusionMatrix,
) -> Result<()> {
    if dataset.is_empty() {
        return Err(Error::EmptyInput);
    }
    debug!(samples = dataset.len(), "starting leave-one-out cross-validation");

    for (i, held_out) in dataset.iter().enumerate() {
        let predicted = predict_held_out(dataset, i, classifier)?;
        let actual = held_out.label_or_unknown();
        debug!(
            point = i + 1,
            actual,
            actual_name = entity_name(actual),
            predicted = predicted.as_str(),
            predicted_name = entity_name(&predicted),
            "processed held-out point"
        );
        matrix.increment(actual, &predicted);
    }
    Ok(())
}

/// Leave-One-Out Cross-Validation returning the fraction of held-out records whose
/// predicted label equals their own label.
pub fn loocv_accuracy<C: Classifier + ?Sized>(
    dataset: &[FeatureRecord],
    classifier: &mut C,
) -> Result<f64> {
    if dataset.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut correct = 0usize;
    for (i, held_out) in dataset.iter().enumerate() {
        let predicted = predict_held_out(dataset, i, classifier)?;
        if held_out.label() == Some(predicted.as_str()) {
            correct += 1;
        }
    }
    Ok(correct as f64 / dataset.len() as f64)
}

/// K-fold cross-validation: each non-empty fold is held out once while the classifier
/// trains on the union of the others.
pub fn perform_k_fold<C: Classifier + ?Sized, R: Rng + ?Sized>(
    dataset: &[FeatureRecord],
    k: usize,
    classifier: &mut C,
    matrix: &mut ConfusionMatrix,
    rng: &mut R,
) -> Result<()> {
    if dataset.is_empty() {
        return Err(Error::EmptyInput);
    }
    let folds = create_k_folds(dataset, k, rng)?;
    debug!(samples = dataset.len(), folds = k, "starting k-fold cross-validation");

    for (held, test) in folds.iter().enumerate() {
        if test.is_empty() {
            continue;
        }
        let training: Vec<FeatureRecord> = folds
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != held)
            .flat_map(|(_, fold)| fold.iter().cloned())
            .collect();
        classifier.train(&training)?;

        for record in test {
            let predicted = classifier.predict(record)?;
            matrix.increment(record.label_or_unknown(), &predicted);
        }
        debug!(fold = held, size = test.len(), "evaluated fold");
    }
    Ok(())
}

fn predict_held_out<C: Classifier + ?Sized>(
    dataset: &[FeatureRecord],
    held: usize,
    classifier: &mut C,
) -> Result<String> {
    let training: Vec<FeatureRecord> = dataset
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != held)
        .map(|(_, r)| r.clone())
        .collect();
    classifier.train(&training)?;
    classifier.predict(&dataset[held])
}
