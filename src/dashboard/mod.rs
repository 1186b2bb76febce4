use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::cluster::{ClusterStateProvider, ClusterStateStore, NodeTaskState};
use crate::config::NodeConfig;
use crate::error::{Result, TaskError};
use crate::guard::validate_editable;
use crate::task::{
    CurrentState, EndState, LastRunState, RunState, TaskDefinition, TaskInfo, TaskRegistry,
    TaskState, TaskStatus,
};

#[derive(Clone)]
pub struct DashboardState {
    pub node_id: String,
    pub tasks: Arc<RwLock<TaskRegistry>>,
    pub cluster: Arc<ClusterStateStore>,
}

impl DashboardState {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            node_id: config.node_id.clone(),
            tasks: Arc::new(RwLock::new(TaskRegistry::with_capacity(config.max_tasks))),
            cluster: Arc::new(ClusterStateStore::new(config.clustered)),
        }
    }

    /// Current status of a task, using a fresh cluster snapshot.
    fn describe(&self, task: &TaskInfo) -> TaskStatus {
        let clustered = self.cluster.clustered_task_states(&task.id);
        TaskStatus::describe(task, clustered.as_deref())
    }
}

#[derive(Serialize)]
struct NodeInfoResponse {
    node_id: String,
    clustered: bool,
    task_count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Local scheduler callback body.
#[derive(Deserialize)]
struct LocalStateUpdate {
    #[serde(flatten)]
    current_state: CurrentState,
    #[serde(default)]
    last_run: Option<LastRunState>,
}

/// Report from one cluster node; the node id comes from the path.
#[derive(Deserialize)]
struct NodeReport {
    state: TaskState,
    #[serde(default)]
    run_state: Option<RunState>,
    #[serde(default)]
    end_state: Option<EndState>,
    #[serde(default)]
    last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    last_run_duration_ms: Option<u64>,
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskError::NotEditable => StatusCode::PRECONDITION_FAILED,
            TaskError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            TaskError::NotClustered | TaskError::InvalidStatesFile(_) | TaskError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            TaskError::RegistryFull => StatusCode::SERVICE_UNAVAILABLE,
            TaskError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(state: DashboardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/node", get(node_info_handler))
        .route("/api/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/api/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/api/tasks/{id}/state", put(local_state_handler))
        .route("/api/tasks/{id}/nodes/{node_id}", put(node_report_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run_dashboard(
    addr: SocketAddr,
    state: DashboardState,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = router(state);

    tracing::info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr).await.inspect_err(|e| {
        tracing::error!(addr = %addr, error = %e, "Failed to bind dashboard server");
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Dashboard server stopped");
    Ok(())
}

async fn node_info_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let task_count = state.tasks.read().await.len();
    Json(NodeInfoResponse {
        node_id: state.node_id.clone(),
        clustered: state.cluster.is_clustered(),
        task_count,
    })
}

async fn list_tasks_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let tasks = state.tasks.read().await;
    let statuses: Vec<TaskStatus> = tasks
        .all_tasks()
        .into_iter()
        .map(|task| state.describe(task))
        .collect();
    Json(statuses)
}

async fn create_task_handler(
    State(state): State<DashboardState>,
    Json(definition): Json<TaskDefinition>,
) -> Result<impl IntoResponse> {
    let task = TaskInfo::new(definition);
    let status = state.describe(&task);

    let mut tasks = state.tasks.write().await;
    if !tasks.add_task(task) {
        tracing::warn!(task_id = %status.id, "Task registry at capacity, task dropped");
        return Err(TaskError::RegistryFull);
    }
    tracing::info!(task_id = %status.id, name = %status.name, "Task created");

    Ok((StatusCode::CREATED, Json(status)))
}

async fn get_task_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<TaskStatus>> {
    let tasks = state.tasks.read().await;
    let task = tasks
        .get_task(&id)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;
    Ok(Json(state.describe(task)))
}

/// Replace a task definition, provided it is not running anywhere.
///
/// The registry write lock is held across the check and the update so a
/// local state change cannot interleave. Remote nodes can still start a run
/// right after the check.
async fn update_task_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Json(definition): Json<TaskDefinition>,
) -> Result<Json<TaskStatus>> {
    let mut tasks = state.tasks.write().await;
    let local = tasks
        .get_task(&id)
        .map(|task| task.current_state.state)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;

    let clustered = state.cluster.clustered_task_states(&id);
    validate_editable(local, clustered.as_deref()).inspect_err(|_| {
        tracing::warn!(task_id = %id, local_state = %local, "Edit rejected, task is running");
    })?;

    tasks.update_definition(&id, definition);
    tracing::info!(task_id = %id, "Task definition updated");

    let task = tasks
        .get_task(&id)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;
    Ok(Json(TaskStatus::describe(task, clustered.as_deref())))
}

async fn delete_task_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let mut tasks = state.tasks.write().await;
    let local = tasks
        .get_task(&id)
        .map(|task| task.current_state.state)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;

    let clustered = state.cluster.clustered_task_states(&id);
    validate_editable(local, clustered.as_deref()).inspect_err(|_| {
        tracing::warn!(task_id = %id, local_state = %local, "Delete rejected, task is running");
    })?;

    tasks.remove_task(&id);
    let forgotten = state.cluster.forget_task(&id);
    tracing::info!(task_id = %id, forgotten_reports = forgotten, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn local_state_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Json(update): Json<LocalStateUpdate>,
) -> Result<Json<TaskStatus>> {
    let mut tasks = state.tasks.write().await;
    if !tasks.update_current_state(&id, update.current_state) {
        return Err(TaskError::TaskNotFound(id));
    }
    if let Some(last_run) = update.last_run {
        tasks.record_run(&id, last_run);
    }
    tracing::debug!(task_id = %id, state = %update.current_state.state, "Local state updated");

    let task = tasks
        .get_task(&id)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;
    Ok(Json(state.describe(task)))
}

async fn node_report_handler(
    State(state): State<DashboardState>,
    Path((id, node_id)): Path<(String, String)>,
    Json(report): Json<NodeReport>,
) -> Result<Json<TaskStatus>> {
    let tasks = state.tasks.read().await;
    let task = tasks
        .get_task(&id)
        .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;

    let node_state = NodeTaskState {
        node_id,
        state: report.state,
        run_state: report.run_state,
        end_state: report.end_state,
        last_run: report.last_run,
        last_run_duration_ms: report.last_run_duration_ms,
    };
    tracing::debug!(
        task_id = %id,
        node_id = %node_state.node_id,
        status = node_state.status(),
        "Node report received"
    );
    state.cluster.report(&id, node_state)?;

    Ok(Json(state.describe(task)))
}
