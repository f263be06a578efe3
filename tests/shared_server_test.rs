//! The process-wide shared server. It lives in a static, so this binary
//! holds a single test that walks its whole lifecycle.

use dashboard_probe::config::HarnessConfig;
use dashboard_probe::error::ProbeError;
use dashboard_probe::harness::{shared_server, shutdown_shared};
use std::sync::Arc;
use wiremock::MockServer;

#[tokio::test]
async fn test_shared_server_attaches_then_shuts_down() {
    let mock_server = MockServer::start().await;
    let config = HarnessConfig::new().with_base_url(mock_server.uri());

    let server = shared_server(&config).await.unwrap();
    assert!(!server.is_spawned());
    assert_eq!(server.base_url(), mock_server.uri());
    let temp = server.temp_dir().to_path_buf();
    assert!(temp.exists());

    // Later calls reuse the first server and ignore their config
    let other = HarnessConfig::new().with_base_url("http://127.0.0.1:1");
    let again = shared_server(&other).await.unwrap();
    assert!(Arc::ptr_eq(&server, &again));

    shutdown_shared().await.unwrap();
    assert!(server.is_stopped());
    assert!(!temp.exists());

    match shared_server(&config).await {
        Err(ProbeError::NotStarted) => {}
        Err(other) => panic!("Expected NotStarted, got {:?}", other),
        Ok(_) => panic!("Expected NotStarted, got the stopped server"),
    }
}
