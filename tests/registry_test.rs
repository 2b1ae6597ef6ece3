//! Integration tests for the transport registry.

use std::sync::Arc;
use taskbridge_mcp::config::AppConfig;
use taskbridge_mcp::error::TaskBridgeError;
use taskbridge_mcp::transport::{TransportConfig, TransportManager, validate_transport_type};
use taskbridge_mcp::TransportType;

#[tokio::test]
async fn test_register_then_get_returns_same_config() {
    let manager = TransportManager::new();
    let config = TransportConfig::new(TransportType::Sse)
        .with_address("0.0.0.0")
        .with_port(9090)
        .with_timeout_secs(5)
        .with_option("sse_path", "/events");

    assert!(manager.register(config.clone()).await.is_none());

    let stored = manager.get(TransportType::Sse).await.unwrap();
    assert_eq!(stored.transport, TransportType::Sse);
    assert_eq!(stored.address, "0.0.0.0");
    assert_eq!(stored.port, 9090);
    assert_eq!(stored.timeout_secs, 5);
    assert_eq!(stored.option_str("sse_path"), Some("/events"));
}

#[tokio::test]
async fn test_last_registration_wins() {
    let manager = TransportManager::new();
    manager
        .register(TransportConfig::new(TransportType::Http).with_port(8080))
        .await;
    let replaced = manager
        .register(TransportConfig::new(TransportType::Http).with_port(9000))
        .await;

    assert_eq!(replaced.map(|c| c.port), Some(8080));
    assert_eq!(manager.get(TransportType::Http).await.unwrap().port, 9000);
    assert_eq!(manager.len().await, 1);
}

#[tokio::test]
async fn test_missing_transport_is_not_found() {
    let manager = TransportManager::new();
    manager
        .register(TransportConfig::new(TransportType::Sse).with_port(9090))
        .await;

    assert!(manager.contains(TransportType::Sse).await);
    assert!(!manager.contains(TransportType::Http).await);

    let err = manager.get(TransportType::Http).await.unwrap_err();
    assert!(matches!(err, TaskBridgeError::NotFound { .. }));
    assert!(err.to_string().contains("http"));
}

#[tokio::test]
async fn test_registry_seeded_from_config() {
    let config = AppConfig {
        server_port: 9191,
        ..AppConfig::default()
    };
    let manager = TransportManager::from_config(&config);

    let mut listed = manager.list().await;
    listed.sort_by_key(|t| t.as_str());
    assert_eq!(
        listed,
        vec![TransportType::Http, TransportType::Sse, TransportType::Stdio]
    );
    assert_eq!(manager.get(TransportType::Http).await.unwrap().port, 9191);
    assert_eq!(manager.get(TransportType::Sse).await.unwrap().port, 9191);
}

#[tokio::test]
async fn test_concurrent_registration() {
    let manager = Arc::new(TransportManager::new());

    let mut handles = Vec::new();
    for port in 9000..9032u16 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            let transport = TransportType::ALL[usize::from(port) % 3];
            manager
                .register(TransportConfig::new(transport).with_port(port))
                .await;
            manager.get(transport).await.is_ok()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(manager.len().await, 3);
    for transport in TransportType::ALL {
        let port = manager.get(transport).await.unwrap().port;
        assert!((9000..9032).contains(&port));
    }
}

#[test]
fn test_validate_transport_type() {
    assert_eq!(validate_transport_type("http").unwrap(), TransportType::Http);
    assert_eq!(validate_transport_type(" SSE ").unwrap(), TransportType::Sse);

    for name in ["", "websocket", "grpc", "tcp"] {
        let err = validate_transport_type(name).unwrap_err();
        assert!(
            matches!(err, TaskBridgeError::UnsupportedTransport { .. }),
            "{name:?} should be unsupported"
        );
    }
}
