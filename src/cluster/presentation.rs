use serde::Serialize;

use crate::cluster::aggregate::{aggregate_end_state, aggregate_state};
use crate::cluster::node_state::NodeTaskState;
use crate::task::EndState;

/// One row of the per-node breakdown shown alongside the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStateView {
    pub node_id: String,
    pub status: String,
    pub status_description: String,
    pub last_run_result: Option<String>,
}

impl From<&NodeTaskState> for NodeStateView {
    fn from(node: &NodeTaskState) -> Self {
        Self {
            node_id: node.node_id.clone(),
            status: node.status().to_string(),
            status_description: node.status_description().to_string(),
            last_run_result: node
                .end_state
                .map(|end| last_run_result(end, node.last_run_duration_ms)),
        }
    }
}

/// Formats an outcome as `"<label>"` or `"<label> [<seconds>s]"`.
///
/// The duration is truncated to whole seconds.
pub fn last_run_result(end_state: EndState, duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => format!("{} [{}s]", end_state.label(), ms / 1000),
        None => end_state.label().to_string(),
    }
}

/// Per-node breakdown for a task, or `None` when it would only be noise.
///
/// The breakdown is suppressed when nothing is running anywhere and the
/// cluster-wide outcome is either unknown or OK.
pub fn build_presentation(nodes: Option<&[NodeTaskState]>) -> Option<Vec<NodeStateView>> {
    let nodes = nodes?;
    let state = aggregate_state(nodes)?;

    let noteworthy_end = matches!(
        aggregate_end_state(nodes),
        Some(EndState::Failed | EndState::Canceled)
    );
    if !state.is_running() && !noteworthy_end {
        return None;
    }

    Some(nodes.iter().map(NodeStateView::from).collect())
}
