//! JSON/binary round-trip helpers for [`Graph`], mirroring the teacher's
//! side-by-side `serde_json`/`bincode` serialization convention.

use steptrack_core::{ErrorInfo, Graph, SteptrackError};

/// Serializes the graph to a pretty JSON string.
pub fn graph_to_json(graph: &Graph) -> Result<String, SteptrackError> {
    serde_json::to_string_pretty(graph)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("graph-serialize-json", err.to_string())))
}

/// Restores a graph from its JSON representation.
pub fn graph_from_json(json: &str) -> Result<Graph, SteptrackError> {
    serde_json::from_str(json)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("graph-deserialize-json", err.to_string())))
}

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &Graph) -> Result<Vec<u8>, SteptrackError> {
    bincode::serialize(graph)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("graph-serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Graph, SteptrackError> {
    bincode::deserialize(bytes)
        .map_err(|err| SteptrackError::Io(ErrorInfo::new("graph-deserialize-bytes", err.to_string())))
}
