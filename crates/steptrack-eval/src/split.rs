//! Deterministic 80/20 train/validation split.
//!
//! The source shares a single `RandomState(0)` across every leave-one-out
//! fold, so fold `i`'s split depends on how many folds ran before it —
//! fine for a sequential loop but incompatible with the independent,
//! parallel-safe folds this harness requires (§5: "Workers share nothing
//! mutable"). Each fold instead derives its own substream seed from the
//! harness master seed and the fold index, giving the same determinism
//! guarantee without serializing fold execution.

use rand::seq::SliceRandom;
use steptrack_core::RngHandle;

/// Shuffles `indices` deterministically (seeded by `fold_seed`) and splits
/// them 80/20 into `(train, val)`. At least one index lands in each half
/// whenever `indices.len() >= 2`.
pub fn train_val_split(indices: &[usize], fold_seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut shuffled = indices.to_vec();
    let mut rng = RngHandle::from_seed(fold_seed);
    shuffled.shuffle(&mut rng);

    let n = shuffled.len();
    let n_val = if n < 2 {
        0
    } else {
        ((n as f64) * 0.2).round().clamp(1.0, (n - 1) as f64) as usize
    };
    let (train, val) = shuffled.split_at(n - n_val);
    (train.to_vec(), val.to_vec())
}
