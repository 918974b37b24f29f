pub mod config;
pub mod exec;
pub mod nodes;
pub mod task;
