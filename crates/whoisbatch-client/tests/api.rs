use std::time::Duration;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use whoisbatch_client::{LookupClient, LookupError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> LookupClient {
    LookupClient::builder().base_url(server.uri()).build().unwrap()
}

#[tokio::test]
async fn test_free_lookup_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/8.8.8.8"))
        .and(query_param("fields", "status,message,country,countryCode,isp,org,query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "isp": "Google LLC",
            "org": "Google Public DNS",
            "query": "8.8.8.8"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let resp = assert_ok!(client.free().lookup("8.8.8.8".parse().unwrap()).await);
    assert_eq!(resp.country_code.as_deref(), Some("US"));
    assert_eq!(resp.combined_name(), "Google LLC / Google Public DNS");
}

#[tokio::test]
async fn test_free_lookup_fail_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/10.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "private range",
            "query": "10.0.0.1"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = assert_err!(client.free().lookup("10.0.0.1".parse().unwrap()).await);
    assert!(matches!(err, LookupError::ServiceRejected(ref m) if m == "private range"));
}

#[tokio::test]
async fn test_free_lookup_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/1.2.3.4"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "60"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = assert_err!(client.free().lookup("1.2.3.4".parse().unwrap()).await);
    assert!(matches!(err, LookupError::RateLimited { retry_after: Some(60) }));
}

#[tokio::test]
async fn test_free_lookup_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/1.1.1.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = assert_err!(client.free().lookup("1.1.1.1".parse().unwrap()).await);
    assert!(matches!(err, LookupError::Json(_)));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/9.9.9.9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = LookupClient::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let err = assert_err!(client.free().lookup("9.9.9.9".parse().unwrap()).await);
    assert!(matches!(err, LookupError::Timeout(_)));
}

#[tokio::test]
async fn test_paid_lookup_with_privacy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/185.220.101.1"))
        .and(query_param("token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "185.220.101.1",
            "country": "DE",
            "org": "AS60729 Stiftung Erneuerbare Freiheit",
            "privacy": {"vpn": false, "proxy": false, "tor": true, "relay": false, "hosting": true, "service": ""}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let resp = assert_ok!(client.paid("tok").lookup("185.220.101.1".parse().unwrap()).await);
    assert_eq!(resp.organization(), "Stiftung Erneuerbare Freiheit");
    let privacy = resp.privacy.unwrap();
    assert!(privacy.tor && privacy.hosting && !privacy.vpn);
}

#[tokio::test]
async fn test_paid_lookup_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/8.8.8.8"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": {"title": "Wrong token"}})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = assert_err!(client.paid("bad").lookup("8.8.8.8".parse().unwrap()).await);
    assert!(matches!(err, LookupError::Unauthorized));
}

#[tokio::test]
async fn test_rdap_network_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip/8.8.8.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectClassName": "ip network",
            "handle": "NET-8-8-8-0-2",
            "name": "GOGL"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let name = assert_ok!(client.rdap().network_name("8.8.8.8".parse().unwrap()).await);
    assert_eq!(name.as_deref(), Some("GOGL"));
}

#[tokio::test]
async fn test_rdap_blank_name_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip/1.1.1.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "  "})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let name = assert_ok!(client.rdap().network_name("1.1.1.1".parse().unwrap()).await);
    assert!(name.is_none());
}

#[tokio::test]
async fn test_exit_node_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exit-addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "ExitNode ABC\nExitAddress 185.220.101.1 2024-05-01 11:02:11\nExitAddress 185.220.101.2 2024-05-01 11:02:11\n",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let set = assert_ok!(client.exit_nodes().fetch().await);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&"185.220.101.2".parse().unwrap()));
}
