use std::collections::BTreeMap;

use proptest::prelude::*;
use steptrack_core::{Graph, Step};
use steptrack_tracker::ViterbiTracker;

fn chain_graph(n: usize) -> Graph {
    let mut steps = Vec::with_capacity(n);
    steps.push(Step::new(0, 1.0, 0.0));
    for i in 1..n - 1 {
        steps.push(Step::new(i, 3.0, 0.5));
    }
    steps.push(Step::new(n - 1, 1.0, 0.0));

    let mut edges = vec![BTreeMap::new(); n];
    for i in 0..n - 1 {
        edges[i].insert(i + 1, 1.0);
    }
    Graph::new(steps, edges).unwrap()
}

fn identity_cm(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

proptest! {
    // spec §8 property 1: a single-peaked observation sequence keeps its
    // dominant step as the final segment of the best history.
    #[test]
    fn single_peaked_observation_keeps_dominant_step_in_final_history(
        (n, dominant) in (3usize..6).prop_flat_map(|n| (Just(n), 1usize..n - 1)),
        frames in 1usize..6,
    ) {
        let graph = chain_graph(n);
        let cm = identity_cm(n);
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![dominant]));

        let mut observations = vec![vec![0.0; frames]; n];
        for t in 0..frames {
            observations[dominant][t] = 1.0;
        }

        let oracle = BTreeMap::new();
        let results = tracker.predict(&observations, &cm, &oracle).unwrap();
        let (_, history) = results.last().unwrap();

        prop_assert_eq!(history.last(), Some(&dominant));
    }

    // spec §8 property 3: log-probabilities never increase as a history is
    // extended by another frame, since transition and observation
    // log-terms are both <= 0.
    #[test]
    fn log_probability_never_increases_across_frames(
        n in 3usize..6,
        frames in 2usize..6,
        start_offset in 0usize..5,
        frame_values in prop::collection::vec(0.0f64..1.0, 3..30),
    ) {
        let start = start_offset % n;
        let graph = chain_graph(n);
        let cm = identity_cm(n);
        let mut tracker = ViterbiTracker::new(&graph, Some(vec![start]));

        let mut values = frame_values.into_iter().cycle();
        let mut observations = vec![vec![0.0; frames]; n];
        for t in 0..frames {
            for row in observations.iter_mut() {
                row[t] = values.next().unwrap();
            }
        }

        let oracle = BTreeMap::new();
        let results = tracker.predict(&observations, &cm, &oracle).unwrap();

        for window in results.windows(2) {
            prop_assert!(window[1].0 <= window[0].0 + 1e-9);
        }
    }
}
