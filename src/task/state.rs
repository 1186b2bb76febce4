use serde::{Deserialize, Serialize};

/// Top-level lifecycle state of a task on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Queued, waiting for its next execution.
    Waiting,
    /// Executing right now.
    Running,
    Ok,
    Failed,
    Canceled,
}

impl TaskState {
    pub fn is_running(self) -> bool {
        self == TaskState::Running
    }

    pub fn is_waiting(self) -> bool {
        self == TaskState::Waiting
    }

    pub fn is_done(self) -> bool {
        self.end_state().is_some()
    }

    /// Terminal outcome this state represents, if it is terminal.
    pub fn end_state(self) -> Option<EndState> {
        match self {
            TaskState::Ok => Some(EndState::Ok),
            TaskState::Failed => Some(EndState::Failed),
            TaskState::Canceled => Some(EndState::Canceled),
            TaskState::Waiting | TaskState::Running => None,
        }
    }

    /// Aggregation rank: RUNNING > WAITING > terminal.
    pub fn rank(self) -> u8 {
        match self {
            TaskState::Running => 2,
            TaskState::Waiting => 1,
            TaskState::Ok | TaskState::Failed | TaskState::Canceled => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Waiting => "WAITING",
            TaskState::Running => "RUNNING",
            TaskState::Ok => "OK",
            TaskState::Failed => "FAILED",
            TaskState::Canceled => "CANCELED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskState::Waiting => "Waiting",
            TaskState::Running => "Running",
            TaskState::Ok => "Ok",
            TaskState::Failed => "Failed",
            TaskState::Canceled => "Canceled",
        }
    }
}

impl From<EndState> for TaskState {
    fn from(end: EndState) -> Self {
        match end {
            EndState::Ok => TaskState::Ok,
            EndState::Failed => TaskState::Failed,
            EndState::Canceled => TaskState::Canceled,
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained state, only meaningful while a task is [`TaskState::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    #[serde(rename = "RUNNING_STARTING")]
    Starting,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "RUNNING_BLOCKED")]
    Blocked,
    #[serde(rename = "RUNNING_CANCELED")]
    Canceled,
}

impl RunState {
    /// Aggregation rank: CANCELED > RUNNING > BLOCKED > STARTING.
    pub fn rank(self) -> u8 {
        match self {
            RunState::Canceled => 3,
            RunState::Running => 2,
            RunState::Blocked => 1,
            RunState::Starting => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Starting => "RUNNING_STARTING",
            RunState::Running => "RUNNING",
            RunState::Blocked => "RUNNING_BLOCKED",
            RunState::Canceled => "RUNNING_CANCELED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunState::Starting => "Starting",
            RunState::Running => "Running",
            RunState::Blocked => "Blocked",
            RunState::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a concluded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndState {
    Ok,
    Failed,
    Canceled,
}

impl EndState {
    /// Aggregation rank: FAILED > CANCELED > OK.
    pub fn rank(self) -> u8 {
        match self {
            EndState::Failed => 2,
            EndState::Canceled => 1,
            EndState::Ok => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EndState::Ok => "OK",
            EndState::Failed => "FAILED",
            EndState::Canceled => "CANCELED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EndState::Ok => "Ok",
            EndState::Failed => "Failed",
            EndState::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for EndState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_predicates() {
        assert!(TaskState::Running.is_running());
        assert!(!TaskState::Waiting.is_running());
        assert!(TaskState::Waiting.is_waiting());
        assert!(TaskState::Ok.is_done());
        assert!(TaskState::Failed.is_done());
        assert!(TaskState::Canceled.is_done());
        assert!(!TaskState::Running.is_done());
        assert!(!TaskState::Waiting.is_done());
    }

    #[test]
    fn terminal_states_map_to_end_states() {
        for end in [EndState::Ok, EndState::Failed, EndState::Canceled] {
            assert_eq!(TaskState::from(end).end_state(), Some(end));
        }
        assert_eq!(TaskState::Running.end_state(), None);
    }

    #[test]
    fn run_state_ranks_form_a_total_order() {
        let ordered = [
            RunState::Starting,
            RunState::Blocked,
            RunState::Running,
            RunState::Canceled,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].rank() < pair[1].rank(), "{:?}", pair);
        }
    }

    #[test]
    fn end_state_ranks_form_a_total_order() {
        assert!(EndState::Ok.rank() < EndState::Canceled.rank());
        assert!(EndState::Canceled.rank() < EndState::Failed.rank());
    }

    #[test]
    fn labels_match_presentation_table() {
        assert_eq!(RunState::Running.label(), "Running");
        assert_eq!(RunState::Starting.label(), "Starting");
        assert_eq!(RunState::Blocked.label(), "Blocked");
        assert_eq!(RunState::Canceled.label(), "Canceled");
        assert_eq!(EndState::Ok.label(), "Ok");
        assert_eq!(EndState::Failed.label(), "Failed");
        assert_eq!(EndState::Canceled.label(), "Canceled");
        assert_eq!(TaskState::Waiting.label(), "Waiting");
    }

    #[test]
    fn serde_uses_stable_identifiers() {
        assert_eq!(
            serde_json::to_string(&RunState::Starting).unwrap(),
            "\"RUNNING_STARTING\""
        );
        assert_eq!(
            serde_json::to_string(&TaskState::Waiting).unwrap(),
            "\"WAITING\""
        );
        let state: RunState = serde_json::from_str("\"RUNNING_BLOCKED\"").unwrap();
        assert_eq!(state, RunState::Blocked);
        assert_eq!(RunState::Blocked.to_string(), "RUNNING_BLOCKED");
    }
}
