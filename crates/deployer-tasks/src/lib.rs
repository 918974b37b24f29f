pub mod context;
pub mod laravel;
pub mod options;
pub mod registry;
pub mod task;

pub use context::{CliContext, ContextState, WorkingContext};
pub use options::TaskOptions;
pub use registry::create_task;
pub use task::{Task, TaskInvocation};
