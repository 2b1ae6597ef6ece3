//! Task tools.
//!
//! No task platform is wired in yet: both tools answer with fixed text so
//! MCP clients can exercise discovery and invocation end to end.

use crate::error::{Result, TaskBridgeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Text returned by `list_tasks`.
pub const LIST_TASKS_RESPONSE: &str = "Available tasks from taskbridge-mcp";
/// Text returned by `get_task`.
pub const GET_TASK_RESPONSE: &str = "Task details";

/// Input for the list_tasks tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksInput {
    /// Maximum number of tasks to return
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Input for the get_task tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetTaskInput {
    /// Task ID
    pub task_id: String,
}

/// Handler for the task tools.
#[derive(Debug, Clone, Default)]
pub struct TaskToolHandler;

impl TaskToolHandler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self
    }

    /// List tasks.
    pub fn list_tasks(&self, input: ListTasksInput) -> Result<String> {
        info!(limit = ?input.limit, "Tool 'list_tasks' called");
        Ok(LIST_TASKS_RESPONSE.to_string())
    }

    /// Get a single task.
    ///
    /// The task ID is trimmed and must not be empty.
    pub fn get_task(&self, input: GetTaskInput) -> Result<String> {
        let task_id = input.task_id.trim();
        if task_id.is_empty() {
            return Err(TaskBridgeError::invalid_argument("task_id is required"));
        }
        info!(task_id = %task_id, "Tool 'get_task' called");
        Ok(GET_TASK_RESPONSE.to_string())
    }
}
