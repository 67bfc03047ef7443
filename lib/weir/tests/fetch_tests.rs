//! End-to-end tests for `Fetch` dispatch using wiremock.

use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use weir::{CancellationToken, ErrorKind, Fetch, Options};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

fn text_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "text/plain")
}

#[tokio::test]
async fn typed_json_handler_receives_decoded_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(json_response(r#"{"id":1,"name":"Alice"}"#))
        .mount(&mock_server)
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));

    let (calls2, seen2) = (Arc::clone(&calls), Arc::clone(&seen));
    Fetch::new(format!("{}/users/1", mock_server.uri()))
        .on_json(move |user: User| {
            calls2.fetch_add(1, Ordering::SeqCst);
            *seen2.lock().expect("lock") = Some(user);
        })
        .dispatch()
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let user = seen.lock().expect("lock").clone().expect("user");
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Alice");
}

#[tokio::test]
async fn dynamic_json_handler_receives_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(json_response(r#"{"id":7,"tags":["a","b"]}"#))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(None));

    let seen2 = Arc::clone(&seen);
    Fetch::new(format!("{}/data", mock_server.uri()))
        .on_json_value(move |value| {
            *seen2.lock().expect("lock") = Some(value);
        })
        .dispatch()
        .await;

    let value = seen.lock().expect("lock").clone().expect("value");
    assert_eq!(value["id"], 7);
    assert_eq!(value["tags"][1], "b");
}

#[tokio::test]
async fn post_without_body_sends_empty_json_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Fetch::new(format!("{}/submit", mock_server.uri()))
        .via_post()
        .dispatch()
        .await;

    // Mock expectation (exactly one matching request) verified on drop
}

#[tokio::test]
async fn post_with_json_body_sends_serialized_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"name": "Bob"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Fetch::new(format!("{}/users", mock_server.uri()))
        .via_post()
        .with_json_body(&serde_json::json!({"name": "Bob"}))
        .expect("serialize")
        .dispatch()
        .await;
}

#[tokio::test]
async fn status_handler_returning_false_suppresses_text_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(text_response(404, "gone"))
        .mount(&mock_server)
        .await;

    let status_calls = Arc::new(AtomicUsize::new(0));
    let text_called = Arc::new(AtomicBool::new(false));

    let (status2, text2) = (Arc::clone(&status_calls), Arc::clone(&text_called));
    Fetch::new(format!("{}/missing", mock_server.uri()))
        .when_status(404, move |code| {
            assert_eq!(code, 404);
            status2.fetch_add(1, Ordering::SeqCst);
            false
        })
        .expect("register")
        .on_text(move |_| text2.store(true, Ordering::SeqCst))
        .dispatch()
        .await;

    assert_eq!(status_calls.load(Ordering::SeqCst), 1);
    assert!(!text_called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn status_handler_returning_true_allows_text_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/greeting"))
        .respond_with(text_response(200, "hello"))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(String::new()));

    let seen2 = Arc::clone(&seen);
    Fetch::new(format!("{}/greeting", mock_server.uri()))
        .when_status(200, |_| true)
        .expect("register")
        .on_text(move |text| *seen2.lock().expect("lock") = text)
        .dispatch()
        .await;

    assert_eq!(*seen.lock().expect("lock"), "hello");
}

#[tokio::test]
async fn text_handler_skipped_for_json_unless_ignore_flag_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(json_response(r#"{"ok":true}"#))
        .mount(&mock_server)
        .await;

    let url = format!("{}/data", mock_server.uri());

    let called = Arc::new(AtomicBool::new(false));
    let called2 = Arc::clone(&called);
    Fetch::new(url.as_str())
        .on_text(move |_| called2.store(true, Ordering::SeqCst))
        .dispatch()
        .await;
    assert!(!called.load(Ordering::SeqCst));

    let called = Arc::new(AtomicBool::new(false));
    let called2 = Arc::clone(&called);
    Fetch::with_options(url.as_str(), Options::default().with_ignore_media_type_check())
        .on_text(move |_| called2.store(true, Ordering::SeqCst))
        .dispatch()
        .await;
    assert!(called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn text_handler_survives_json_registration() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/greeting"))
        .respond_with(text_response(200, "hello"))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(String::new()));
    let json_called = Arc::new(AtomicBool::new(false));

    // Registering a JSON handler after the text handler must not clear it.
    let (seen2, json2) = (Arc::clone(&seen), Arc::clone(&json_called));
    Fetch::new(format!("{}/greeting", mock_server.uri()))
        .on_text(move |text| *seen2.lock().expect("lock") = text)
        .on_json_value(move |_| json2.store(true, Ordering::SeqCst))
        .dispatch()
        .await;

    assert_eq!(*seen.lock().expect("lock"), "hello");
    assert!(!json_called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stream_handler_receives_media_type_and_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![1u8, 2, 3, 4], "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new((String::new(), Vec::new())));

    let seen2 = Arc::clone(&seen);
    Fetch::new(format!("{}/blob", mock_server.uri()))
        .on_stream(move |media_type, reader| {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer).expect("read");
            *seen2.lock().expect("lock") = (media_type.to_string(), buffer);
        })
        .dispatch()
        .await;

    let (media_type, bytes) = seen.lock().expect("lock").clone();
    assert_eq!(media_type, "application/octet-stream");
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn per_request_header_wins_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/check"))
        .and(header("X-Test", "b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = Options::default().with_header("X-Test", "a");
    Fetch::with_options(format!("{}/check", mock_server.uri()), options)
        .header("X-Test", "b")
        .expect("header")
        .dispatch()
        .await;
}

#[tokio::test]
async fn bearer_override_wins_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth"))
        .and(header("Authorization", "Bearer override"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = Options::default().with_bearer("base");
    Fetch::with_options(format!("{}/auth", mock_server.uri()), options)
        .bearer("override")
        .dispatch()
        .await;
}

#[tokio::test]
async fn default_user_agent_sent_on_the_wire() {
    let mock_server = MockServer::start().await;

    let expected = format!("weir/{}", env!("CARGO_PKG_VERSION"));
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("User-Agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Fetch::new(format!("{}/ua", mock_server.uri()))
        .dispatch()
        .await;
}

#[tokio::test]
async fn malformed_json_routes_to_codec_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(json_response("not json at all"))
        .mount(&mock_server)
        .await;

    let codec_calls = Arc::new(AtomicUsize::new(0));
    let transport_calls = Arc::new(AtomicUsize::new(0));

    let (codec2, transport2) = (Arc::clone(&codec_calls), Arc::clone(&transport_calls));
    Fetch::new(format!("{}/broken", mock_server.uri()))
        .on_json(|_: User| panic!("decode should fail"))
        .on_error(ErrorKind::Codec, move |_| {
            codec2.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(ErrorKind::Transport, move |_| {
            transport2.fetch_add(1, Ordering::SeqCst);
        })
        .dispatch()
        .await;

    assert_eq!(codec_calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn matching_error_handlers_fire_in_registration_order() {
    // Connection refused: nothing listens on port 1
    let order = Arc::new(Mutex::new(Vec::new()));

    let o1 = Arc::clone(&order);
    let o2 = Arc::clone(&order);
    let o3 = Arc::clone(&order);
    Fetch::new("http://127.0.0.1:1/")
        .on_error(ErrorKind::Transport, move |_| {
            o1.lock().expect("lock").push("transport");
        })
        .on_error(ErrorKind::Codec, move |_| {
            o2.lock().expect("lock").push("codec");
        })
        .on_error(ErrorKind::Any, move |_| {
            o3.lock().expect("lock").push("any");
        })
        .dispatch()
        .await;

    assert_eq!(*order.lock().expect("lock"), vec!["transport", "any"]);
}

#[test]
fn blocking_dispatch_returns_normally_on_connection_refused() {
    let calls = Arc::new(AtomicUsize::new(0));

    let calls2 = Arc::clone(&calls);
    Fetch::new("http://127.0.0.1:1/")
        .on_error(ErrorKind::Any, move |err| {
            assert!(err.is_connection(), "expected connection error, got {err}");
            calls2.fetch_add(1, Ordering::SeqCst);
        })
        .dispatch_blocking();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn blocking_dispatch_swallows_unmatched_errors() {
    let calls = Arc::new(AtomicUsize::new(0));

    // Connection refused, but only a codec handler registered: nothing
    // fires and the call still returns normally.
    let calls2 = Arc::clone(&calls);
    Fetch::new("http://127.0.0.1:1/")
        .on_error(ErrorKind::Codec, move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        })
        .dispatch_blocking();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellation_suppresses_all_handlers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(text_response(200, "late"))
        .mount(&mock_server)
        .await;

    let fired = Arc::new(AtomicBool::new(false));

    let token = CancellationToken::new();
    token.cancel();

    let (f1, f2, f3) = (
        Arc::clone(&fired),
        Arc::clone(&fired),
        Arc::clone(&fired),
    );
    Fetch::new(format!("{}/slow", mock_server.uri()))
        .when_status(200, move |_| {
            f1.store(true, Ordering::SeqCst);
            true
        })
        .expect("register")
        .on_text(move |_| f2.store(true, Ordering::SeqCst))
        .on_error(ErrorKind::Any, move |_| f3.store(true, Ordering::SeqCst))
        .dispatch_cancellable(token)
        .await;

    assert!(!fired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn invalid_url_routes_to_request_handler() {
    let calls = Arc::new(AtomicUsize::new(0));

    let calls2 = Arc::clone(&calls);
    Fetch::new("definitely not a url")
        .on_error(ErrorKind::Request, move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        })
        .dispatch()
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
