use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::state::{EndState, RunState, TaskState};

/// User-editable part of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub type_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            enabled: true,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// State of the task as known by the local scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    pub state: TaskState,
    #[serde(default)]
    pub run_state: Option<RunState>,
}

impl CurrentState {
    pub fn waiting() -> Self {
        Self {
            state: TaskState::Waiting,
            run_state: None,
        }
    }

    pub fn running(run_state: RunState) -> Self {
        Self {
            state: TaskState::Running,
            run_state: Some(run_state),
        }
    }
}

/// Outcome of the most recent local run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRunState {
    pub end_state: EndState,
    pub run_started: DateTime<Utc>,
    pub run_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub definition: TaskDefinition,
    pub current_state: CurrentState,
    pub last_run: Option<LastRunState>,
    pub created_at: DateTime<Utc>,
}

impl TaskInfo {
    pub fn new(definition: TaskDefinition) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), definition, Utc::now())
    }

    pub fn with_id(id: String, definition: TaskDefinition, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            definition,
            current_state: CurrentState::waiting(),
            last_run: None,
            created_at,
        }
    }
}
