use chrono::{DateTime, Utc};
use content_dispatcher::views::alert_range_document;
use content_dispatcher::{
    ContentViews, DispatcherConfig, Error, FixedClock, HttpDispatcher, ProductProfile, QueryExecutor,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(server: &MockServer) -> HttpDispatcher {
    let config = DispatcherConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    HttpDispatcher::new(&config)
}

fn frozen(s: &str) -> FixedClock {
    FixedClock(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
}

#[tokio::test]
async fn test_posts_json_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "site.alertRange"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "result": "3"})))
        .expect(1)
        .mount(&server)
        .await;

    let value = dispatcher_for(&server)
        .execute(&alert_range_document())
        .await
        .unwrap();
    assert_eq!(value, json!({"code": 200, "result": "3"}));
}

#[tokio::test]
async fn test_communities_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"query": "site.alertRange"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 2})))
        .expect(1)
        .mount(&server)
        .await;
    let communities = json!({
        "code": 200,
        "result": [{"id": "communities/susya", "title": "Susya", "lastAlertDate": ""}]
    });
    Mock::given(method("POST"))
        .and(body_string_contains("template('community')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(communities.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let views = ContentViews::with_clock(
        dispatcher_for(&server),
        ProductProfile::default(),
        frozen("2024-06-01T00:00:00Z"),
    );
    let result = views.communities().await.unwrap();
    assert_eq!(result, communities);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let filter = "filterBy('alertDate', '>=', '2024-04-01T00:00:00.000Z')";
    for key in ["lastAlertDate", "lastAlertText"] {
        assert!(body["select"][key].as_str().unwrap().contains(filter));
    }
}

#[tokio::test]
async fn test_remote_error_is_returned_as_value() {
    let server = MockServer::start().await;
    let failure = json!({"status": "error", "message": "Invalid query"});
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(failure.clone()))
        .mount(&server)
        .await;

    let views = ContentViews::new(dispatcher_for(&server), ProductProfile::default());
    let value = views.community("does-not-exist").await.unwrap();
    assert_eq!(value, failure);
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let views = ContentViews::new(dispatcher_for(&server), ProductProfile::default());
    let err = views.site_title().await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_transport_failure_is_passed_through() {
    // Bind and release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = DispatcherConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        ..Default::default()
    };
    let dispatcher = HttpDispatcher::new(&config);

    let err = dispatcher.execute(&alert_range_document()).await.unwrap_err();
    match err {
        Error::Transport(inner) => assert!(inner.is_connect(), "unexpected error: {inner:?}"),
        other => panic!("Expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_range_fetch_failure_skips_main_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let views = ContentViews::new(dispatcher_for(&server), ProductProfile::default());
    assert!(views.communities().await.is_err());
}
