use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cluster::presentation::last_run_result;
use crate::cluster::{AggregateState, NodeStateView, NodeTaskState};
use crate::task::info::TaskInfo;
use crate::task::state::{EndState, RunState, TaskState};

/// What the dashboard shows for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    pub id: String,
    pub name: String,
    pub type_id: String,
    pub enabled: bool,
    pub state: TaskState,
    pub run_state: Option<RunState>,
    pub status: String,
    pub status_description: String,
    pub end_state: Option<EndState>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_run_duration_ms: Option<u64>,
    pub last_run_result: Option<String>,
    /// Per-node breakdown; only present in a cluster, and only when noteworthy.
    pub nodes: Option<Vec<NodeStateView>>,
}

impl TaskStatus {
    /// Build the view from cluster reports when there are any, otherwise from
    /// the local scheduler's state.
    pub fn describe(task: &TaskInfo, clustered: Option<&[NodeTaskState]>) -> Self {
        match clustered.and_then(AggregateState::from_nodes) {
            Some(aggregate) => Self::from_aggregate(task, aggregate),
            None => Self::from_local(task),
        }
    }

    fn from_local(task: &TaskInfo) -> Self {
        let state = task.current_state.state;
        let run_state = task.current_state.run_state.filter(|_| state.is_running());
        let last_run = task.last_run;
        Self::assemble(
            task,
            state,
            run_state,
            last_run.map(|r| r.end_state),
            last_run.map(|r| r.run_started),
            last_run.map(|r| r.run_duration_ms),
            None,
        )
    }

    fn from_aggregate(task: &TaskInfo, aggregate: AggregateState) -> Self {
        Self::assemble(
            task,
            aggregate.state,
            aggregate.run_state,
            aggregate.end_state,
            aggregate.last_run,
            aggregate.last_run_duration_ms,
            aggregate.nodes,
        )
    }

    fn assemble(
        task: &TaskInfo,
        state: TaskState,
        run_state: Option<RunState>,
        end_state: Option<EndState>,
        last_run: Option<DateTime<Utc>>,
        last_run_duration_ms: Option<u64>,
        nodes: Option<Vec<NodeStateView>>,
    ) -> Self {
        let (status, status_description) = match run_state {
            Some(run_state) => (run_state.as_str(), run_state.label()),
            None => (state.as_str(), state.label()),
        };

        Self {
            id: task.id.clone(),
            name: task.definition.name.clone(),
            type_id: task.definition.type_id.clone(),
            enabled: task.definition.enabled,
            state,
            run_state,
            status: status.to_string(),
            status_description: status_description.to_string(),
            end_state,
            last_run,
            last_run_duration_ms,
            last_run_result: end_state.map(|end| last_run_result(end, last_run_duration_ms)),
            nodes,
        }
    }
}
