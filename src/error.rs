use thiserror::Error;

/// Fixed message carried by every rejected edit.
pub const EDIT_REJECTED_MESSAGE: &str =
    "Task can not be edited while it is being executed or it is in line to be executed";

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{}", EDIT_REJECTED_MESSAGE)]
    NotEditable,

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Node is not running in clustered mode")]
    NotClustered,

    #[error("Task registry is at capacity")]
    RegistryFull,

    #[error("Invalid states file: {0}")]
    InvalidStatesFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
