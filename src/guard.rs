use crate::cluster::NodeTaskState;
use crate::error::{Result, TaskError};
use crate::task::TaskState;

/// Check whether a task definition may be changed right now.
///
/// Rejects when the task is running locally or on any node of the cluster.
/// `clustered` is `None` outside a cluster, in which case only the local
/// state counts.
///
/// This is a point-in-time check, not a lock: a run may start right after it
/// passes. Callers that need atomicity must pair it with mutual exclusion in
/// the scheduler.
pub fn validate_editable(local: TaskState, clustered: Option<&[NodeTaskState]>) -> Result<()> {
    if local.is_running() {
        return Err(TaskError::NotEditable);
    }

    let running_elsewhere = clustered
        .into_iter()
        .flatten()
        .find(|node| node.state.is_running());
    if let Some(node) = running_elsewhere {
        tracing::debug!(node_id = %node.node_id, "Task is running on another node");
        return Err(TaskError::NotEditable);
    }

    Ok(())
}
