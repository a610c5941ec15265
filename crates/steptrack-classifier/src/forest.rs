//! Bagged decision-tree classifier: the idiomatic-Rust analogue of the
//! original `sklearn.ensemble.RandomForestClassifier` default (§4.5, §9).

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use steptrack_core::{derive_substream_seed, ErrorInfo, RngHandle, SteptrackError};

use crate::config::ClassifierConfig;
use crate::traits::{pad_missing_classes, StepClassifier};

/// Bags `config.n_trees` independently bootstrapped [`DecisionTree`]
/// learners and averages their votes into a probability distribution.
#[derive(Serialize, Deserialize)]
pub struct ForestClassifier {
    config: ClassifierConfig,
    trees: Vec<DecisionTree<f64, usize>>,
    num_classes: usize,
}

impl ForestClassifier {
    /// Creates an untrained forest with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            num_classes: 0,
        }
    }

    /// Number of classes the forest was last fitted against.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

impl StepClassifier for ForestClassifier {
    fn fit(
        &mut self,
        features: &Array2<f64>,
        labels: &[usize],
        num_classes: usize,
    ) -> Result<(), SteptrackError> {
        let (padded_features, padded_labels) = pad_missing_classes(features, labels, num_classes);
        let n_samples = padded_features.nrows();
        if n_samples == 0 {
            return Err(SteptrackError::Classifier(ErrorInfo::new(
                "empty-training-set",
                "cannot fit a classifier with zero training rows",
            )));
        }

        let mut trees = Vec::with_capacity(self.config.n_trees);
        for tree_index in 0..self.config.n_trees {
            let substream = derive_substream_seed(self.config.seed, tree_index as u64);
            let mut rng = RngHandle::from_seed(substream);

            let sample_indices: Vec<usize> =
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let bootstrap_features = padded_features.select(Axis(0), &sample_indices);
            let bootstrap_labels: Array1<usize> = sample_indices
                .iter()
                .map(|&idx| padded_labels[idx])
                .collect();

            let dataset = Dataset::new(bootstrap_features, bootstrap_labels);
            let tree = DecisionTree::params()
                .max_depth(self.config.max_depth)
                .fit(&dataset)
                .map_err(|err| {
                    SteptrackError::Classifier(ErrorInfo::new(
                        "tree-fit-failed",
                        err.to_string(),
                    ))
                })?;
            trees.push(tree);
        }

        self.trees = trees;
        self.num_classes = num_classes;
        Ok(())
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>, SteptrackError> {
        if self.trees.is_empty() {
            return Err(SteptrackError::Usage(ErrorInfo::new(
                "predict-before-fit",
                "predict_proba() called before fit()",
            )));
        }

        let mut votes = Array2::<f64>::zeros((features.nrows(), self.num_classes));
        for tree in &self.trees {
            let predictions = tree.predict(features);
            for (row, &predicted_class) in predictions.iter().enumerate() {
                if predicted_class < self.num_classes {
                    votes[[row, predicted_class]] += 1.0;
                }
            }
        }
        votes /= self.trees.len() as f64;
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fits_and_predicts_a_separable_two_class_problem() {
        let features = array![[0.0], [0.1], [10.0], [10.1]];
        let labels = vec![0usize, 0usize, 1usize, 1usize];
        let mut clf = ForestClassifier::new(ClassifierConfig {
            n_trees: 5,
            max_depth: Some(3),
            seed: 42,
            cache_dir: None,
        });
        clf.fit(&features, &labels, 2).unwrap();
        let proba = clf.predict_proba(&array![[0.05], [10.05]]).unwrap();
        assert_eq!(proba.nrows(), 2);
        assert_eq!(proba.ncols(), 2);
        for row in proba.outer_iter() {
            let total: f64 = row.sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn predict_before_fit_is_usage_error() {
        let clf = ForestClassifier::new(ClassifierConfig::default());
        let err = clf.predict_proba(&Array2::zeros((1, 1))).unwrap_err();
        assert!(matches!(err, SteptrackError::Usage(_)));
    }
}
