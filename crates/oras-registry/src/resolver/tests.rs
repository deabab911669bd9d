//! Unit tests for the resolver handle

use super::*;

use crate::client::default_client;
use crate::DockerConfigStore;

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `host:port` of a mock server
fn mock_host(server: &MockServer) -> String {
    server.address().to_string()
}

#[test]
fn test_endpoint_scheme_follows_plain_http() {
    let secure = Resolver::anonymous(default_client(), false);
    assert_eq!(
        secure.endpoint("ghcr.io").unwrap().as_str(),
        "https://ghcr.io/"
    );

    let plain = Resolver::anonymous(default_client(), true);
    assert_eq!(
        plain.endpoint("localhost:5000").unwrap().as_str(),
        "http://localhost:5000/"
    );
}

#[test]
fn test_docker_hub_endpoint() {
    let resolver = Resolver::anonymous(default_client(), false);
    assert_eq!(
        resolver.endpoint("docker.io").unwrap().as_str(),
        "https://registry-1.docker.io/"
    );
}

#[test]
fn test_invalid_host() {
    let resolver = Resolver::anonymous(default_client(), false);
    let err = resolver.endpoint("bad host").unwrap_err();
    assert!(matches!(err, OrasError::InvalidReference { .. }));
}

#[test]
fn test_explicit_credential_for_any_host() {
    let resolver = Resolver::new(
        default_client(),
        false,
        AuthStrategy::Explicit(Credential::new("user", "pass")),
    );

    assert_eq!(resolver.strategy(), StrategyKind::Explicit);
    for host in ["ghcr.io", "docker.io", "localhost:5000", ""] {
        assert_eq!(resolver.credential(host), Some(Credential::new("user", "pass")));
    }
}

#[test]
fn test_anonymous_has_no_credential() {
    let resolver = Resolver::anonymous(default_client(), true);
    assert_eq!(resolver.strategy(), StrategyKind::Anonymous);
    assert_eq!(resolver.credential("ghcr.io"), None);
}

#[test]
fn test_strategy_display() {
    assert_eq!(StrategyKind::Explicit.to_string(), "explicit credentials");
    assert_eq!(StrategyKind::StoreBacked.to_string(), "credential store");
    assert_eq!(StrategyKind::Anonymous.to_string(), "anonymous");
}

#[tokio::test]
async fn test_ping_sends_basic_auth() {
    let mock_server = MockServer::start().await;

    // "user:pass"
    Mock::given(method("GET"))
        .and(path("/v2/"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(
        default_client(),
        true,
        AuthStrategy::Explicit(Credential::new("user", "pass")),
    );

    let status = resolver.ping(&mock_host(&mock_server)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ping_anonymous_sends_no_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = Resolver::anonymous(default_client(), true);
    let status = resolver.ping(&mock_host(&mock_server)).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ping_store_backed_uses_host_entry() {
    let mock_server = MockServer::start().await;
    let host = mock_host(&mock_server);

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{ "auths": {{ "{}": {{ "username": "user", "password": "pass" }} }} }}"#,
            host
        ),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = DockerConfigStore::load(&[config_path]).unwrap();
    let resolver = store.resolver(default_client(), true).unwrap();
    assert_eq!(resolver.strategy(), StrategyKind::StoreBacked);

    let status = resolver.ping(&host).await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ping_empty_store_entry_stays_anonymous() {
    let mock_server = MockServer::start().await;
    let host = mock_host(&mock_server);

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{ "auths": {{ "{}": {{ "username": "", "password": "" }} }} }}"#,
            host
        ),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = DockerConfigStore::load(&[config_path]).unwrap();
    let resolver = store.resolver(default_client(), true).unwrap();
    assert_eq!(resolver.credential(&host), None);

    let status = resolver.ping(&host).await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ping_unreachable_registry() {
    let mock_server = MockServer::start().await;
    let host = mock_host(&mock_server);
    drop(mock_server);

    let resolver = Resolver::anonymous(default_client(), true);
    let err = resolver.ping(&host).await.unwrap_err();
    assert!(matches!(err, OrasError::Network { .. }));
}
