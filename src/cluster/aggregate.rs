//! Reduction of per-node reports into a single cluster-wide answer.
//!
//! Every function here is a pure fold over the slice it is given: the result
//! depends only on the multiset of reports, never on node order, and calling
//! it twice on the same input yields the same value.
//!
//! Priority orders (highest wins) come from the `rank()` tables on the state
//! enums:
//!
//! | reduction              | order                                 |
//! |------------------------|---------------------------------------|
//! | [`aggregate_state`]     | RUNNING > WAITING > terminal          |
//! | [`aggregate_run_state`] | CANCELED > RUNNING > BLOCKED > STARTING |
//! | [`aggregate_end_state`] | FAILED > CANCELED > OK                |

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cluster::node_state::NodeTaskState;
use crate::cluster::presentation::{build_presentation, NodeStateView};
use crate::task::{EndState, RunState, TaskState};

/// Cluster-wide lifecycle state. `None` only for an empty slice.
///
/// When every node is terminal but the kinds differ, the terminal kind is
/// picked with the end-state order so the result does not depend on which
/// node happens to come first.
pub fn aggregate_state(nodes: &[NodeTaskState]) -> Option<TaskState> {
    nodes.iter().map(|n| n.state).max_by_key(|state| {
        let terminal_rank = state.end_state().map(EndState::rank).unwrap_or(0);
        (state.rank(), terminal_rank)
    })
}

/// Run sub-state across the nodes that are currently RUNNING.
///
/// A RUNNING node that did not report a sub-state counts as plain RUNNING.
/// Sub-states on nodes that are not RUNNING are ignored.
pub fn aggregate_run_state(nodes: &[NodeTaskState]) -> Option<RunState> {
    nodes
        .iter()
        .filter(|n| n.state.is_running())
        .map(|n| n.run_state.unwrap_or(RunState::Running))
        .max_by_key(|run_state| run_state.rank())
}

/// Terminal outcome across the nodes that reported one.
pub fn aggregate_end_state(nodes: &[NodeTaskState]) -> Option<EndState> {
    nodes
        .iter()
        .filter_map(|n| n.end_state)
        .max_by_key(|end_state| end_state.rank())
}

/// Most recent run start reported by any node.
pub fn aggregate_last_run(nodes: &[NodeTaskState]) -> Option<DateTime<Utc>> {
    nodes.iter().filter_map(|n| n.last_run).max()
}

/// Longest last-run duration (the slowest node), not a sum.
pub fn aggregate_run_duration(nodes: &[NodeTaskState]) -> Option<u64> {
    nodes.iter().filter_map(|n| n.last_run_duration_ms).max()
}

/// Every aggregate for one task, computed fresh from a report snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateState {
    pub state: TaskState,
    pub run_state: Option<RunState>,
    pub end_state: Option<EndState>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_run_duration_ms: Option<u64>,
    /// Per-node breakdown, absent when nothing noteworthy is happening.
    pub nodes: Option<Vec<NodeStateView>>,
}

impl AggregateState {
    /// Returns `None` for an empty slice.
    pub fn from_nodes(nodes: &[NodeTaskState]) -> Option<Self> {
        let state = aggregate_state(nodes)?;
        Some(Self {
            state,
            run_state: aggregate_run_state(nodes),
            end_state: aggregate_end_state(nodes),
            last_run: aggregate_last_run(nodes),
            last_run_duration_ms: aggregate_run_duration(nodes),
            nodes: build_presentation(Some(nodes)),
        })
    }
}
