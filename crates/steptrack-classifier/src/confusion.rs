//! Row-normalized confusion matrix estimation.

use ndarray::Array2;

use crate::traits::StepClassifier;
use steptrack_core::SteptrackError;

/// Computes `CM[i][j]`, the empirical row-normalized probability that the
/// classifier predicts class `j` when the true class is `i`. Rows summing
/// to zero (no validation samples of that true class) are left as zero
/// rather than producing a division-by-zero NaN.
pub fn confusion_probabilities(
    clf: &dyn StepClassifier,
    features: &Array2<f64>,
    labels: &[usize],
    num_classes: usize,
) -> Result<Vec<Vec<f64>>, SteptrackError> {
    let proba = clf.predict_proba(features)?;
    let predictions: Vec<usize> = proba
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        })
        .collect();

    let mut counts = vec![vec![0.0_f64; num_classes]; num_classes];
    for (&true_class, &predicted_class) in labels.iter().zip(predictions.iter()) {
        if true_class < num_classes && predicted_class < num_classes {
            counts[true_class][predicted_class] += 1.0;
        }
    }

    for row in &mut counts {
        let total: f64 = row.iter().sum();
        if total > 0.0 {
            for cell in row.iter_mut() {
                *cell /= total;
            }
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubClassifier {
        proba: Array2<f64>,
    }

    impl StepClassifier for StubClassifier {
        fn fit(&mut self, _: &Array2<f64>, _: &[usize], _: usize) -> Result<(), SteptrackError> {
            Ok(())
        }

        fn predict_proba(&self, _: &Array2<f64>) -> Result<Array2<f64>, SteptrackError> {
            Ok(self.proba.clone())
        }
    }

    #[test]
    fn zero_sample_rows_are_left_as_zero() {
        let clf = StubClassifier {
            proba: Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 0.0, 1.0]).unwrap(),
        };
        let features = Array2::<f64>::zeros((2, 1));
        let labels = vec![0usize, 0usize];
        let cm = confusion_probabilities(&clf, &features, &labels, 2).unwrap();
        assert_eq!(cm[0], vec![1.0, 0.0]);
        assert_eq!(cm[1], vec![0.0, 0.0]);
    }
}
