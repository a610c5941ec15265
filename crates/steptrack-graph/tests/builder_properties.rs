use proptest::collection::vec as pvec;
use proptest::prelude::*;
use steptrack_graph::build_graph;

fn canonical_steps() -> Vec<String> {
    vec!["begin".to_string(), "A".to_string(), "B".to_string(), "end".to_string()]
}

proptest! {
    #[test]
    fn build_graph_is_order_insensitive(
        trace_labels in pvec(pvec(0usize..2, 1..8), 1..6),
    ) {
        let canonical = canonical_steps();
        let traces: Vec<Vec<String>> = trace_labels
            .iter()
            .map(|labels| {
                labels
                    .iter()
                    .map(|&i| if i == 0 { "A".to_string() } else { "B".to_string() })
                    .collect()
            })
            .collect();
        let sources: Vec<String> = (0..traces.len()).map(|i| format!("p{i}.json")).collect();

        let (forward, _) = build_graph(&traces, &canonical, &sources).unwrap();

        let mut reversed_traces = traces;
        reversed_traces.reverse();
        let (reversed, _) = build_graph(&reversed_traces, &canonical, &sources).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&forward).unwrap(),
            serde_json::to_string(&reversed).unwrap()
        );
    }
}
