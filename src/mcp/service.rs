//! MCP service implementation using rmcp.
//!
//! This module defines the TaskService struct with the task tools exposed
//! via the MCP protocol using the rmcp framework's macros. One service value
//! is built per server; every transport session gets a clone of it.

use crate::info::{APP_NAME, APP_TITLE, VERSION};
use crate::tools::{GetTaskInput, ListTasksInput, TaskToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

/// MCP service exposing the task tools.
#[derive(Clone)]
pub struct TaskService {
    handler: TaskToolHandler,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl TaskService {
    /// Create a new TaskService with all task tools registered.
    pub fn new() -> Self {
        Self {
            handler: TaskToolHandler::new(),
            tool_router: Self::tool_router(),
        }
    }

    /// Names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl TaskService {
    #[tool(description = "List all available tasks")]
    async fn list_tasks(
        &self,
        Parameters(input): Parameters<ListTasksInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.handler.list_tasks(input)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get details of a specific task")]
    async fn get_task(
        &self,
        Parameters(input): Parameters<GetTaskInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.handler.get_task(input)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for TaskService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: APP_NAME.to_owned(),
                title: Some(APP_TITLE.to_owned()),
                version: VERSION.to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Task tools bridging task management platforms \
                (Microsoft To Do, Google Tasks, Todoist, Notion).\n\
                \n\
                ## Tools\n\
                - `list_tasks`: list available tasks; `limit` is accepted but not yet applied\n\
                - `get_task`: get details of one task by `task_id`"
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_both_tools() {
        let service = TaskService::new();
        let mut names = service.tool_names();
        names.sort();
        assert_eq!(names, vec!["get_task", "list_tasks"]);
    }

    #[test]
    fn test_get_task_schema_marks_task_id_required() {
        let service = TaskService::new();
        let tool = service
            .tool_router
            .list_all()
            .into_iter()
            .find(|t| t.name == "get_task")
            .unwrap();
        let required = tool.input_schema.get("required").unwrap();
        assert!(required.as_array().unwrap().iter().any(|v| v == "task_id"));
    }

    #[test]
    fn test_server_info() {
        let service = TaskService::new();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "taskbridge-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_instructions_do_not_promise_limit() {
        let instructions = TaskService::new().get_info().instructions.unwrap();
        assert!(instructions.contains("`limit` is accepted but not yet applied"));
        assert!(!instructions.contains("caps the number"));
    }
}
