//! KNN and K-Means evaluated with leave-one-out cross-validation.
//!
//! Reads a signature folder when a path is given, otherwise uses a small synthetic set.

use shapetag::entity::entity_name;
use shapetag::eval::{normalize_unit, perform_loocv, ConfusionMatrix};
use shapetag::loader::extract_from_folder;
use shapetag::{Classifier, FeatureRecord, KMeans, Knn, Metric};

fn synthetic() -> Vec<FeatureRecord> {
    let centers = [("01", 0.0, 0.0), ("06", 5.0, 5.0), ("13", 10.0, 0.0)];
    let offsets = [(0.0, 0.0), (0.1, 0.2), (0.2, 0.1), (-0.1, 0.1)];
    centers
        .iter()
        .flat_map(|&(label, cx, cy)| {
            offsets
                .iter()
                .map(move |&(dx, dy)| FeatureRecord::labeled(vec![cx + dx, cy + dy], label))
        })
        .collect()
}

fn main() -> shapetag::Result<()> {
    let data = match std::env::args().nth(1) {
        Some(dir) => extract_from_folder(dir)?,
        None => synthetic(),
    };
    let data = normalize_unit(&data);

    for metric in [Metric::Euclidean, Metric::Manhattan, Metric::Minkowski(3)] {
        let mut knn = Knn::new(3, metric.clone());
        let mut cm = ConfusionMatrix::from_records(&data);
        perform_loocv(&data, &mut knn, &mut cm)?;
        println!("=== KNN (k=3, {metric}) ===");
        print!("{cm}");
        println!(
            "accuracy {:.3}  precision {:.3}  recall {:.3}  f1 {:.3}\n",
            cm.accuracy(),
            cm.global_precision(),
            cm.global_recall(),
            cm.global_f1_score()
        );
    }

    let mut kmeans = KMeans::new(3, Metric::Euclidean).with_seed(42);
    kmeans.train(&data)?;
    println!("=== K-means (k=3) ===");
    for record in &data {
        let label = record.label_or_unknown();
        println!(
            "  {:>3} ({:<14}) => {}",
            label,
            entity_name(label),
            kmeans.predict(record)?
        );
    }
    println!(
        "SSE {:.4}  silhouette {:.4}",
        kmeans.calculate_sse()?,
        kmeans.calculate_silhouette_score()?
    );
    Ok(())
}
