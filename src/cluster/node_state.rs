use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::task::{EndState, RunState, TaskState};

/// State of one task as reported by a single cluster node.
///
/// `run_state` is only expected while `state` is RUNNING and `end_state` only
/// once the node has finished a run. Either may be missing when the node has
/// not run the task yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTaskState {
    pub node_id: String,
    pub state: TaskState,
    #[serde(default)]
    pub run_state: Option<RunState>,
    #[serde(default)]
    pub end_state: Option<EndState>,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_run_duration_ms: Option<u64>,
}

impl NodeTaskState {
    pub fn new(node_id: impl Into<String>, state: TaskState) -> Self {
        Self {
            node_id: node_id.into(),
            state,
            run_state: None,
            end_state: None,
            last_run: None,
            last_run_duration_ms: None,
        }
    }

    pub fn with_run_state(mut self, run_state: RunState) -> Self {
        self.run_state = Some(run_state);
        self
    }

    pub fn with_end_state(mut self, end_state: EndState) -> Self {
        self.end_state = Some(end_state);
        self
    }

    pub fn with_last_run(mut self, last_run: DateTime<Utc>) -> Self {
        self.last_run = Some(last_run);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.last_run_duration_ms = Some(duration_ms);
        self
    }

    /// Stable status identifier: the run sub-state when present, else the state.
    pub fn status(&self) -> &'static str {
        match self.run_state {
            Some(run_state) => run_state.as_str(),
            None => self.state.as_str(),
        }
    }

    pub fn status_description(&self) -> &'static str {
        match self.run_state {
            Some(run_state) => run_state.label(),
            None => self.state.label(),
        }
    }
}

/// Load a non-empty JSON array of node reports from disk.
pub fn load_states_file(path: &Path) -> Result<Vec<NodeTaskState>> {
    let contents = std::fs::read_to_string(path)?;
    let nodes: Vec<NodeTaskState> = serde_json::from_str(&contents)?;
    if nodes.is_empty() {
        return Err(TaskError::InvalidStatesFile(format!(
            "{} contains no node reports",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), nodes = nodes.len(), "Loaded node reports");
    Ok(nodes)
}
