//! The classifier seam: any object satisfying `fit`/`predict_proba` can
//! drive the evaluation harness and tracker. Expressed as a trait, never
//! as a base class the default forest inherits from.

use ndarray::Array2;
use steptrack_core::SteptrackError;

/// A multiclass probabilistic classifier over stacked per-frame feature
/// vectors.
pub trait StepClassifier {
    /// Fits the classifier on `features` (one row per frame) against
    /// `labels` (parallel canonical step indices), padding any class in
    /// `0..num_classes` absent from `labels` with a zero-feature row so
    /// every class is represented in the fit.
    fn fit(
        &mut self,
        features: &Array2<f64>,
        labels: &[usize],
        num_classes: usize,
    ) -> Result<(), SteptrackError>;

    /// Produces a `(rows, num_classes)` matrix of per-class probabilities,
    /// one row per input frame.
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>, SteptrackError>;
}

/// Pads `features`/`labels` with one zero-vector row per class in
/// `0..num_classes` that does not appear in `labels`, so that every class
/// is represented before fitting (§4.5: "otherwise downstream per-class
/// probability outputs are undefined").
pub fn pad_missing_classes(
    features: &Array2<f64>,
    labels: &[usize],
    num_classes: usize,
) -> (Array2<f64>, Vec<usize>) {
    let mut present = vec![false; num_classes];
    for &label in labels {
        if label < num_classes {
            present[label] = true;
        }
    }
    let missing: Vec<usize> = (0..num_classes).filter(|&c| !present[c]).collect();
    if missing.is_empty() {
        return (features.clone(), labels.to_vec());
    }

    let n_features = features.ncols();
    let mut padded = Array2::<f64>::zeros((features.nrows() + missing.len(), n_features));
    padded.slice_mut(ndarray::s![..features.nrows(), ..]).assign(features);

    let mut padded_labels = labels.to_vec();
    padded_labels.extend(missing);

    (padded, padded_labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn missing_classes_get_a_zero_row_each() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = vec![0usize, 0usize];
        let (padded, padded_labels) = pad_missing_classes(&features, &labels, 3);
        assert_eq!(padded.nrows(), 3);
        assert_eq!(padded_labels, vec![0, 0, 1, 2]);
        assert_eq!(padded.row(2).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn no_padding_when_all_classes_present() {
        let features = array![[1.0], [2.0]];
        let labels = vec![0usize, 1usize];
        let (padded, padded_labels) = pad_missing_classes(&features, &labels, 2);
        assert_eq!(padded.nrows(), 2);
        assert_eq!(padded_labels, labels);
    }
}
