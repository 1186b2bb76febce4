pub mod cluster;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod shutdown;
pub mod task;
