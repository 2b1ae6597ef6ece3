//! MCP tool implementations.
//!
//! - `list_tasks`: List available tasks
//! - `get_task`: Get details of one task

pub mod tasks;

pub use tasks::{GetTaskInput, ListTasksInput, TaskToolHandler};
