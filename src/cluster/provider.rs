use std::collections::HashMap;
use std::sync::RwLock;

use crate::cluster::node_state::NodeTaskState;
use crate::error::{Result, TaskError};

/// Source of cluster-wide per-node task state.
///
/// Implementations return an owned snapshot so callers never hold a lock
/// across aggregation. `None` means the deployment is not clustered, or that
/// no node has reported on the task yet; an empty list is never returned.
pub trait ClusterStateProvider: Send + Sync {
    fn clustered_task_states(&self, task_id: &str) -> Option<Vec<NodeTaskState>>;
}

/// In-memory store of the latest report from each node, per task.
#[derive(Debug, Default)]
pub struct ClusterStateStore {
    clustered: bool,
    reports: RwLock<HashMap<String, Vec<NodeTaskState>>>,
}

impl ClusterStateStore {
    pub fn new(clustered: bool) -> Self {
        Self {
            clustered,
            reports: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_clustered(&self) -> bool {
        self.clustered
    }

    /// Record a node's report, replacing any earlier report from the same node.
    /// Nodes keep the position of their first report.
    pub fn report(&self, task_id: &str, state: NodeTaskState) -> Result<()> {
        if !self.clustered {
            return Err(TaskError::NotClustered);
        }

        let mut reports = self.reports.write().unwrap_or_else(|e| e.into_inner());
        let nodes = reports.entry(task_id.to_string()).or_default();
        match nodes.iter_mut().find(|n| n.node_id == state.node_id) {
            Some(existing) => *existing = state,
            None => {
                tracing::debug!(task_id, node_id = %state.node_id, "First report from node");
                nodes.push(state);
            }
        }
        Ok(())
    }

    /// Drop every report for a task. Returns the number of reports removed.
    pub fn forget_task(&self, task_id: &str) -> usize {
        let mut reports = self.reports.write().unwrap_or_else(|e| e.into_inner());
        reports.remove(task_id).map(|nodes| nodes.len()).unwrap_or(0)
    }
}

impl ClusterStateProvider for ClusterStateStore {
    fn clustered_task_states(&self, task_id: &str) -> Option<Vec<NodeTaskState>> {
        if !self.clustered {
            return None;
        }
        let reports = self.reports.read().unwrap_or_else(|e| e.into_inner());
        reports
            .get(task_id)
            .filter(|nodes| !nodes.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{RunState, TaskState};

    #[test]
    fn not_clustered_reports_nothing() {
        let store = ClusterStateStore::new(false);
        assert!(matches!(
            store.report("t1", NodeTaskState::new("node-a", TaskState::Waiting)),
            Err(TaskError::NotClustered)
        ));
        assert!(store.clustered_task_states("t1").is_none());
    }

    #[test]
    fn unknown_task_is_absent_not_empty() {
        let store = ClusterStateStore::new(true);
        assert!(store.clustered_task_states("missing").is_none());
    }

    #[test]
    fn report_upserts_and_keeps_arrival_order() {
        let store = ClusterStateStore::new(true);
        store
            .report("t1", NodeTaskState::new("node-b", TaskState::Waiting))
            .unwrap();
        store
            .report("t1", NodeTaskState::new("node-a", TaskState::Waiting))
            .unwrap();
        store
            .report(
                "t1",
                NodeTaskState::new("node-b", TaskState::Running).with_run_state(RunState::Blocked),
            )
            .unwrap();

        let nodes = store.clustered_task_states("t1").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].node_id, "node-b");
        assert_eq!(nodes[0].run_state, Some(RunState::Blocked));
        assert_eq!(nodes[1].node_id, "node-a");
    }

    #[test]
    fn forget_task_removes_reports() {
        let store = ClusterStateStore::new(true);
        store
            .report("t1", NodeTaskState::new("node-a", TaskState::Ok))
            .unwrap();
        assert_eq!(store.forget_task("t1"), 1);
        assert_eq!(store.forget_task("t1"), 0);
        assert!(store.clustered_task_states("t1").is_none());
    }
}
