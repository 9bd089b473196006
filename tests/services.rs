//! End-to-end service calls against a local mock Evolution server.

use std::time::Duration;

use evolution_api::{Credentials, EvolutionClient, EvolutionError, Options};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(base_url: &str) -> EvolutionClient {
    EvolutionClient::builder(Credentials::new(base_url, "it_key").unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn object(value: Value) -> Options {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn send_text_posts_json_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/bot"))
        .and(header("apikey", "it_key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"number": "5511999999999", "text": "hi", "delay": 10})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"key": {"id": "M1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client(&server.uri()).messages("bot").unwrap();
    let sent = messages
        .send_text(
            "5511999999999",
            "hi",
            object(json!({"delay": 10, "number": "ignored"})),
        )
        .await
        .unwrap();

    assert_eq!(sent, json!({"key": {"id": "M1"}}));
}

#[tokio::test]
async fn echoed_payload_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/settings/set/bot"))
        .respond_with(|request: &Request| {
            ResponseTemplate::new(200).set_body_bytes(request.body.clone())
        })
        .mount(&server)
        .await;

    let settings = object(json!({
        "rejectCall": true,
        "msgCall": "busy",
        "groupsIgnore": false,
        "alwaysOnline": true,
        "readMessages": false,
        "readStatus": false,
        "syncFullHistory": false
    }));
    let echoed = client(&server.uri())
        .settings("bot")
        .unwrap()
        .set_settings(settings.clone())
        .await
        .unwrap();

    assert_eq!(echoed, Value::Object(settings));
}

#[tokio::test]
async fn fetch_all_groups_sends_string_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/group/fetchAllGroups/bot"))
        .and(query_param("getParticipants", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1@g.us"}])))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client(&server.uri()).groups("bot").unwrap();
    let found = groups.fetch_all_groups(false).await.unwrap();
    assert_eq!(found, json!([{"id": "1@g.us"}]));
}

#[tokio::test]
async fn connection_state_reads_closed_session_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instance/connectionState/bot"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"state": "close"})))
        .mount(&server)
        .await;

    let state = client(&server.uri())
        .instances("bot")
        .unwrap()
        .connection_state()
        .await
        .unwrap();
    assert_eq!(state, json!({"state": "close"}));
}

#[tokio::test]
async fn unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let instances = client(&base_url).instances("bot").unwrap();

    let state = instances.connection_state().await.unwrap();
    assert_eq!(state, json!([null]));

    let err = instances.restart_instance().await.unwrap_err();
    assert!(matches!(err, EvolutionError::Transport(_)));
    let rendered = err.to_json();
    let object = rendered.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["error"].as_str().unwrap().contains("connect"));
}

#[tokio::test]
async fn connection_state_times_out_to_null_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"state": "open"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = EvolutionClient::builder(Credentials::new(server.uri(), "it_key").unwrap())
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let instances = client.instances("bot").unwrap();

    assert_eq!(instances.connection_state().await.unwrap(), json!([null]));
    let err = instances.fetch_instances().await.unwrap_err();
    assert!(err.to_json()["error"].as_str().unwrap().contains("timeout"));
}

#[tokio::test]
async fn reserved_characters_in_instance_reach_the_server_intact() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/instance/delete/bot%232"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/instance/delete/bot"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let deleted = client(&server.uri())
        .instances("bot#2")
        .unwrap()
        .delete_instance()
        .await
        .unwrap();
    assert_eq!(deleted, json!({"status": "SUCCESS"}));
}

#[tokio::test]
async fn remote_error_is_reported_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/instance/logout/bot"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "error": "Bad Request",
            "response": {"message": ["The \"bot\" instance is not connected"]}
        })))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .instances("bot")
        .unwrap()
        .logout_instance()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_json(), json!({"error": "unexpected HTTP status: 400"}));
    assert_eq!(err.body_json().unwrap()["error"], json!("Bad Request"));
}
