use taskstate::cluster::NodeTaskState;
use taskstate::error::{TaskError, EDIT_REJECTED_MESSAGE};
use taskstate::guard::validate_editable;
use taskstate::task::{EndState, RunState, TaskState};

const REJECTION: &str =
    "Task can not be edited while it is being executed or it is in line to be executed";

#[test]
fn test_running_locally_is_rejected() {
    let err = validate_editable(TaskState::Running, None).unwrap_err();
    assert!(matches!(err, TaskError::NotEditable));
    assert_eq!(err.to_string(), REJECTION);
    assert_eq!(EDIT_REJECTED_MESSAGE, REJECTION);
}

#[test]
fn test_running_locally_is_rejected_regardless_of_cluster() {
    let clustered = vec![
        NodeTaskState::new("node-a", TaskState::Waiting),
        NodeTaskState::new("node-b", TaskState::Ok),
    ];
    let result = validate_editable(TaskState::Running, Some(clustered.as_slice()));
    assert!(matches!(result, Err(TaskError::NotEditable)));
}

#[test]
fn test_running_on_cluster_is_rejected() {
    let clustered = vec![
        NodeTaskState::new("node-a", TaskState::Waiting),
        NodeTaskState::new("node-b", TaskState::Running).with_run_state(RunState::Running),
    ];
    let err = validate_editable(TaskState::Waiting, Some(clustered.as_slice())).unwrap_err();
    assert_eq!(err.to_string(), REJECTION);
}

#[test]
fn test_any_run_sub_state_on_cluster_is_rejected() {
    for run_state in [
        RunState::Starting,
        RunState::Running,
        RunState::Blocked,
        RunState::Canceled,
    ] {
        let clustered =
            vec![NodeTaskState::new("node-a", TaskState::Running).with_run_state(run_state)];
        assert!(
            validate_editable(TaskState::Ok, Some(clustered.as_slice())).is_err(),
            "{run_state:?} should block edits"
        );
    }
}

#[test]
fn test_not_running_is_accepted() {
    let clustered = vec![
        NodeTaskState::new("node-a", TaskState::Waiting),
        NodeTaskState::new("node-b", TaskState::Waiting),
    ];
    assert!(validate_editable(TaskState::Waiting, Some(clustered.as_slice())).is_ok());
}

#[test]
fn test_not_running_without_cluster_is_accepted() {
    for local in [
        TaskState::Waiting,
        TaskState::Ok,
        TaskState::Failed,
        TaskState::Canceled,
    ] {
        assert!(validate_editable(local, None).is_ok(), "{local:?}");
    }
}

#[test]
fn test_failed_nodes_do_not_block_edits() {
    let clustered = vec![
        NodeTaskState::new("node-a", TaskState::Failed),
        NodeTaskState::new("node-b", TaskState::Waiting).with_end_state(EndState::Canceled),
    ];
    assert!(validate_editable(TaskState::Failed, Some(clustered.as_slice())).is_ok());
}

#[test]
fn test_empty_cluster_list_is_accepted() {
    let empty: Vec<NodeTaskState> = Vec::new();
    assert!(validate_editable(TaskState::Waiting, Some(empty.as_slice())).is_ok());
}
