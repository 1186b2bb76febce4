//! Cluster-wide view of a task.
//!
//! Each node runs its own copy of a task and reports its own state. This
//! module collapses those reports into one answer:
//!
//! - [`aggregate`]: the reductions (state, run sub-state, outcome, last run,
//!   duration) and [`AggregateState`] bundling them
//! - [`presentation`]: the per-node breakdown and its suppression rule
//! - [`provider`]: where the reports come from
//!
//! Nothing here caches. Reports are snapshots taken per request and every
//! aggregate is recomputed from them.

pub mod aggregate;
pub mod node_state;
pub mod presentation;
pub mod provider;

pub use aggregate::AggregateState;
pub use node_state::{load_states_file, NodeTaskState};
pub use presentation::{build_presentation, NodeStateView};
pub use provider::{ClusterStateProvider, ClusterStateStore};
