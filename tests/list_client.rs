//! SharePointClient against a local mock server

use floating_feedback::api::{ListClient, ListError, SharePointClient};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> SharePointClient {
    // Trailing slash must not produce a double slash in request paths
    SharePointClient::new(
        format!("{}/sites/intranet/", server.uri()),
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn fetch_choice_field_reads_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(
            r"^/sites/intranet/_api/web/lists/getByTitle\('Feedback'\)/fields/getByInternalNameOrTitle\('Category'\)$",
        ))
        .and(query_param("$select", "Choices,AllowMultipleValues,TypeAsString"))
        .and(header("accept", "application/json;odata=nometadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Choices": ["Bug", "Idea"],
            "TypeAsString": "MultiChoice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let field = client(&server, None)
        .fetch_choice_field("Feedback", "Category")
        .await
        .unwrap();

    assert_eq!(field.choices, Some(vec!["Bug".to_string(), "Idea".to_string()]));
    assert!(field.allows_multiple());
}

#[tokio::test]
async fn create_item_posts_payload_with_odata_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/_api/web/lists/getByTitle\('Feedback'\)/items$"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json;odata=nometadata"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "Id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = json!({ "Title": "Slow search", "Rating": 2, "Category": ["Bug"] });
    client(&server, Some("secret"))
        .create_item("Feedback", &payload)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);

    assert!(received[0].headers.contains_key("odata-version"));

    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body, payload);
}

#[tokio::test]
async fn rejection_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "odata.error": { "message": { "lang": "en-US", "value": "Bad field" } }
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create_item("Feedback", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.display_text(), "Bad field");
}

#[tokio::test]
async fn rejection_without_payload_uses_reason_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .fetch_choice_field("Missing", "Category")
        .await
        .unwrap_err();

    assert_eq!(err.display_text(), "Not Found");
}

#[tokio::test]
async fn quotes_in_list_title_are_doubled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"getByTitle\('Team%27%27s%20Feedback'\)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let field = client(&server, None)
        .fetch_choice_field("Team's Feedback", "Category")
        .await
        .unwrap();
    assert_eq!(field.choices, Some(Vec::new()));
}

#[tokio::test]
async fn unreachable_site_is_a_transport_error() {
    let client = SharePointClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
    let err = client.fetch_choice_field("Feedback", "Category").await.unwrap_err();
    assert!(matches!(err, ListError::Transport(_)));
}
