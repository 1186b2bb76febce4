pub mod info;
pub mod registry;
pub mod state;
pub mod status;

pub use info::{CurrentState, LastRunState, TaskDefinition, TaskInfo};
pub use registry::TaskRegistry;
pub use state::{EndState, RunState, TaskState};
pub use status::TaskStatus;
