//! Anomaly detection walkthrough across the three detectors.
//!
//! Fits an Isolation Forest, DAMEX and a Local Outlier Factor on the same
//! synthetic dataset with planted outliers and prints each detector's
//! ranking alongside a ROC AUC evaluation.
//!
//! Run with:
//! ```bash
//! cargo run --example anomaly_detection
//! ```

use aislar::metrics::roc_auc_score;
use aislar::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== aislar: unsupervised anomaly detection ===\n");

    // 60 samples around (1, 1) with jointly heavy tails, plus 3 planted
    // anomalies that break the cluster's pattern.
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = Vec::with_capacity(63 * 2);
    for _ in 0..60 {
        let base: f32 = rng.gen_range(0.5..1.5);
        data.push(base + rng.gen_range(-0.1..0.1));
        data.push(base + rng.gen_range(-0.1..0.1));
    }
    data.extend_from_slice(&[12.0, -11.0, -10.0, 13.0, 15.0, 15.0]);
    let x = Matrix::from_vec(63, 2, data)?;
    let y_true: Vec<usize> = (0..63).map(|i| usize::from(i >= 60)).collect();

    println!(
        "Dataset: {} samples, {} features, 3 planted anomalies\n",
        x.n_rows(),
        x.n_cols()
    );

    // --- Isolation Forest ---
    println!("--- Isolation Forest ---");
    let mut forest = IsolationForest::new()
        .with_n_estimators(100)
        .with_max_samples(32)
        .with_random_state(42);
    forest.fit(&x)?;

    let forest_scores = forest.predict(&x)?;
    print_top3("isolation score", &forest_scores);
    println!(
        "ROC AUC: {:.3}\n",
        roc_auc_score(forest_scores.as_slice(), &y_true)
    );

    // --- DAMEX ---
    println!("--- DAMEX ---");
    let mut damex = Damex::new().with_epsilon(0.1);
    damex.fit(&x)?;
    println!(
        "learned {} faces, extreme threshold {:.2}",
        damex.mu().len(),
        damex.threshold_extreme().unwrap_or(f32::NAN)
    );

    let (damex_scores, diagnostics) = damex.predict_with_diagnostics(&x)?;
    print_top3("face score (lower = more normal)", &damex_scores);
    println!(
        "{} non-extreme samples, mass hit ratio {:.2}",
        diagnostics.n_non_extreme, diagnostics.mass_hit_ratio
    );
    println!(
        "ROC AUC: {:.3}\n",
        roc_auc_score(damex_scores.as_slice(), &y_true)
    );

    // --- Local Outlier Factor ---
    println!("--- Local Outlier Factor ---");
    let mut lof = LocalOutlierFactor::new().with_n_neighbors(5);
    lof.fit(&x)?;

    let factors = lof.outlier_factors()?;
    print_top3("LOF", &factors);
    println!(
        "ROC AUC: {:.3}",
        roc_auc_score(factors.as_slice(), &y_true)
    );

    Ok(())
}

/// Prints the three highest-scoring sample indices.
fn print_top3(label: &str, scores: &Vector<f32>) {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    print!("top {label}:");
    for &i in order.iter().take(3) {
        print!(" #{i} ({:.3})", scores[i]);
    }
    println!();
}
