//! Integration tests driving a full MCP session over an in-process duplex pipe.

use serde_json::{Value, json};
use std::time::Duration;
use taskbridge_mcp::TransportType;
use taskbridge_mcp::mcp::TaskService;
use taskbridge_mcp::transport::{StdioTransport, TransportContext};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

struct Client<R, W> {
    lines: tokio::io::Lines<BufReader<R>>,
    writer: W,
}

impl<R, W> Client<R, W>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(10), self.lines.next_line())
            .await
            .expect("timed out waiting for server message")
            .unwrap()
            .expect("server closed the stream");
        serde_json::from_str(&line).unwrap()
    }

    async fn initialize(&mut self) -> Value {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "stdio-test", "version": "0.1.0" }
            }
        }))
        .await;
        let response = self.recv().await;
        self.send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await;
        response
    }
}

#[tokio::test]
async fn test_stdio_session_lists_and_calls_tools() {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (server_reader, server_writer) = tokio::io::split(server_io);
    let (client_reader, client_writer) = tokio::io::split(client_io);

    let server = tokio::spawn(async move {
        let transport = StdioTransport::new(TaskService::new());
        let ctx = TransportContext::detached(TransportType::Stdio, CancellationToken::new());
        transport.serve_io(server_reader, server_writer, ctx).await
    });

    let mut client = Client {
        lines: BufReader::new(client_reader).lines(),
        writer: client_writer,
    };

    let init = client.initialize().await;
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "taskbridge-mcp");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    client
        .send(json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }))
        .await;
    let list = client.recv().await;
    let mut names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["get_task", "list_tasks"]);

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "get_task", "arguments": { "task_id": "42" } }
        }))
        .await;
    let call = client.recv().await;
    assert_eq!(call["id"], 3);
    assert_eq!(call["result"]["content"][0]["text"], "Task details");

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "list_tasks", "arguments": {} }
        }))
        .await;
    let call = client.recv().await;
    assert_eq!(
        call["result"]["content"][0]["text"],
        "Available tasks from taskbridge-mcp"
    );

    drop(client);
    let result = tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_get_task_without_id_is_an_error() {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (server_reader, server_writer) = tokio::io::split(server_io);
    let (client_reader, client_writer) = tokio::io::split(client_io);

    let shutdown = CancellationToken::new();
    let server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            let transport = StdioTransport::new(TaskService::new());
            let ctx = TransportContext::detached(TransportType::Stdio, shutdown);
            transport.serve_io(server_reader, server_writer, ctx).await
        }
    });

    let mut client = Client {
        lines: BufReader::new(client_reader).lines(),
        writer: client_writer,
    };
    client.initialize().await;

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": { "name": "get_task", "arguments": { "task_id": "  " } }
        }))
        .await;
    let response = client.recv().await;
    assert_eq!(response["id"], 2);
    assert_eq!(response["error"]["code"], -32602);

    // Shutdown ends the session even while the client keeps the pipe open.
    shutdown.cancel();
    let result = tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
