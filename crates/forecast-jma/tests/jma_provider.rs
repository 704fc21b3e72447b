//! Integration tests for JmaProvider using wiremock.

use std::time::Duration;

use forecast_core::{AreaCode, ForecastError, ForecastProvider};
use forecast_jma::{BROWSER_USER_AGENT, JmaConfig, JmaProvider};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body() -> serde_json::Value {
    serde_json::json!([{
        "publishingOffice": "気象庁",
        "reportDatetime": "2024-01-01T05:00:00+09:00",
        "timeSeries": [
            {
                "timeDefines": ["2024-01-01T00:00:00+09:00"],
                "areas": [{"area": {"name": "東京地方", "code": "130010"}, "weathers": ["晴れ"]}]
            },
            {
                "timeDefines": ["2024-01-01T00:00:00+09:00"],
                "areas": [{"area": {"name": "東京", "code": "130010"}, "tempsMin": ["2"], "tempsMax": ["11"]}]
            }
        ]
    }])
}

fn provider_for(server: &MockServer) -> JmaProvider {
    JmaProvider::from_config(JmaConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let raw = provider.fetch(&AreaCode::new("130000")).await.unwrap();

    assert_eq!(raw.reports().len(), 1);
    assert_eq!(raw.reports()[0].time_series.len(), 2);
    assert_eq!(
        raw.reports()[0].publishing_office.as_deref(),
        Some("気象庁")
    );
}

#[tokio::test]
async fn test_not_found_is_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch(&AreaCode::new("999999")).await.unwrap_err();

    assert!(err.is_fetch());
    assert!(err.to_string().contains("404"), "Error should mention 404: {}", err);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch(&AreaCode::new("130000")).await.unwrap_err();
    assert!(err.is_fetch());
}

#[tokio::test]
async fn test_unexpected_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "maintenance"})),
        )
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch(&AreaCode::new("130000")).await.unwrap_err();
    assert!(err.is_parse());
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider.fetch(&AreaCode::new("130000")).await.unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("130000"));
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .and(header("user-agent", BROWSER_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = JmaProvider::from_config(JmaConfig {
        base_url: mock_server.uri(),
        user_agent: Some(BROWSER_USER_AGENT.to_string()),
        ..Default::default()
    })
    .unwrap();

    assert!(provider.fetch(&AreaCode::new("130000")).await.is_ok());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/130000.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let provider = JmaProvider::from_config(JmaConfig {
        base_url: mock_server.uri(),
        timeout_secs: 1,
        ..Default::default()
    })
    .unwrap();

    let err = provider.fetch(&AreaCode::new("130000")).await.unwrap_err();
    assert!(matches!(err, ForecastError::Fetch(_)));
}
