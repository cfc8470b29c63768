use axum::{
  Router,
  body::Bytes,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  routing::post,
};
use dtrkiosk::{
  app::AppState, http, models::log::log_record::LogRecord, relay::Relay, store::LogStore,
};
use serde_json::json;
use std::{
  sync::{Arc, Mutex},
  time::Duration,
};
use tokio::task::JoinHandle;

/// Requests seen by the stub upstream: (content-type, body).
type Seen = Arc<Mutex<Vec<(String, String)>>>;

async fn upstream_handler(
  State((status, seen)): State<(StatusCode, Seen)>,
  headers: HeaderMap,
  body: Bytes,
) -> (StatusCode, &'static str) {
  let ctype = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("")
    .to_string();
  seen
    .lock()
    .unwrap()
    .push((ctype, String::from_utf8_lossy(&body).into_owned()));
  (status, "logged")
}

async fn start_upstream(status: StatusCode) -> (String, Seen, JoinHandle<()>) {
  let seen: Seen = Arc::default();
  let app = Router::new()
    .route("/idilg/datalog.php", post(upstream_handler))
    .with_state((status, seen.clone()));
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let handle = tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{}/idilg/datalog.php", addr), seen, handle)
}

/// An address nothing listens on.
async fn dead_upstream() -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  format!("http://{}/idilg/datalog.php", addr)
}

async fn start_server(upstream: &str, records: Vec<LogRecord>) -> (String, JoinHandle<()>) {
  let relay = Relay::new(upstream, false, Duration::from_secs(5)).expect("relay client");
  let state = AppState::new(LogStore::with_records(records), relay);
  let app: Router = http::build_router(state);

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let handle = tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{}", addr), handle)
}

fn rec(id: i64, message: &str) -> LogRecord {
  LogRecord {
    id,
    message: message.to_string(),
  }
}

async fn list(client: &reqwest::Client, base: &str) -> Vec<LogRecord> {
  let res = client
    .get(format!("{}/api/logs", base))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  res.json().await.unwrap()
}

#[tokio::test]
async fn post_relays_form_and_records_entry() {
  let (upstream, seen, _up) = start_upstream(StatusCode::OK).await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;
  let client = reqwest::Client::new();

  let res = client
    .post(format!("{}/api/logs", base))
    .json(&json!({ "qr": "EMP-0042", "name": "Juan Dela Cruz", "lat": 6.9214 }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::CREATED);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(body, json!("ok"));

  let seen = seen.lock().unwrap().clone();
  assert_eq!(seen.len(), 1);
  let (ctype, form) = &seen[0];
  assert_eq!(ctype, "application/x-www-form-urlencoded");
  assert_eq!(form, "qr=EMP-0042&name=Juan+Dela+Cruz&lat=6.9214");

  let logs = list(&client, &base).await;
  assert_eq!(logs.len(), 1);
  assert_eq!(logs[0].id, 1);
  assert_eq!(&logs[0].message, form);
}

#[tokio::test]
async fn post_fails_when_upstream_rejects() {
  let (upstream, seen, _up) = start_upstream(StatusCode::SERVICE_UNAVAILABLE).await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;
  let client = reqwest::Client::new();

  let res = client
    .post(format!("{}/api/logs", base))
    .json(&json!({ "qr": "EMP-0042" }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(
    body,
    json!({ "error": "Failed to fetch data from external endpoint" })
  );
  assert_eq!(seen.lock().unwrap().len(), 1);
  assert!(list(&client, &base).await.is_empty());
}

#[tokio::test]
async fn post_fails_when_upstream_unreachable() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;
  let client = reqwest::Client::new();

  let res = client
    .post(format!("{}/api/logs", base))
    .json(&json!({ "qr": "EMP-0042" }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(
    body["error"].as_str(),
    Some("Failed to fetch data from external endpoint")
  );
}

#[tokio::test]
async fn post_with_malformed_body_is_a_server_error() {
  let (upstream, seen, _up) = start_upstream(StatusCode::OK).await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;
  let client = reqwest::Client::new();

  for body in ["not json", "[1,2,3]"] {
    let res = client
      .post(format!("{}/api/logs", base))
      .header(header::CONTENT_TYPE.as_str(), "application/json")
      .body(body)
      .send()
      .await
      .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
  }
  assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn put_updates_only_the_matching_message() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a"), rec(2, "b")]).await;
  let client = reqwest::Client::new();

  let res = client
    .put(format!("{}/api/logs", base))
    .json(&json!({ "id": 2, "message": "c" }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  let updated: LogRecord = res.json().await.unwrap();
  assert_eq!(updated, rec(2, "c"));

  assert_eq!(list(&client, &base).await, vec![rec(1, "a"), rec(2, "c")]);
}

#[tokio::test]
async fn put_unknown_id_is_not_found() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a")]).await;
  let client = reqwest::Client::new();

  let res = client
    .put(format!("{}/api/logs", base))
    .json(&json!({ "id": 9, "message": "z" }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(body, json!({ "error": "Log not found" }));

  assert_eq!(list(&client, &base).await, vec![rec(1, "a")]);
}

#[tokio::test]
async fn delete_on_empty_store_is_not_found() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;
  let client = reqwest::Client::new();

  let res = client
    .delete(format!("{}/api/logs", base))
    .json(&json!({ "id": 5 }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(body, json!({ "error": "Log not found" }));
  assert!(list(&client, &base).await.is_empty());
}

#[tokio::test]
async fn delete_returns_removed_record() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a"), rec(2, "b"), rec(3, "c")]).await;
  let client = reqwest::Client::new();

  let res = client
    .delete(format!("{}/api/logs", base))
    .json(&json!({ "id": 2 }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  let removed: LogRecord = res.json().await.unwrap();
  assert_eq!(removed, rec(2, "b"));

  assert_eq!(list(&client, &base).await, vec![rec(1, "a"), rec(3, "c")]);
}

#[tokio::test]
async fn index_serves_branded_shell() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, Vec::new()).await;

  let res = reqwest::get(format!("{}/", base)).await.unwrap();
  assert!(res.status().is_success());
  let html = res.text().await.unwrap();
  assert!(html.contains("DILG 9 - DTR"));
  assert!(html.contains("Regional Information Communication and Technology Unit"));
}

#[tokio::test]
async fn put_and_delete_accept_json_without_json_content_type() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a"), rec(2, "b")]).await;
  let client = reqwest::Client::new();

  // Browser fetch with a string body sends text/plain.
  let res = client
    .put(format!("{}/api/logs", base))
    .header(header::CONTENT_TYPE.as_str(), "text/plain;charset=UTF-8")
    .body(r#"{"id":2,"message":"c"}"#)
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  assert_eq!(list(&client, &base).await, vec![rec(1, "a"), rec(2, "c")]);

  let res = client
    .delete(format!("{}/api/logs", base))
    .body(r#"{"id":5}"#)
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
  let body: serde_json::Value = res.json().await.unwrap();
  assert_eq!(body, json!({ "error": "Log not found" }));

  let res = client
    .delete(format!("{}/api/logs", base))
    .header(header::CONTENT_TYPE.as_str(), "text/plain;charset=UTF-8")
    .body(r#"{"id":1}"#)
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  assert_eq!(list(&client, &base).await, vec![rec(2, "c")]);
}

#[tokio::test]
async fn integral_float_ids_match_records() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a"), rec(2, "b")]).await;
  let client = reqwest::Client::new();

  let res = client
    .put(format!("{}/api/logs", base))
    .json(&json!({ "id": 2.0, "message": "c" }))
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::OK);
  assert_eq!(list(&client, &base).await, vec![rec(1, "a"), rec(2, "c")]);
}

#[tokio::test]
async fn malformed_put_body_is_rejected_without_changes() {
  let upstream = dead_upstream().await;
  let (base, _srv) = start_server(&upstream, vec![rec(1, "a")]).await;
  let client = reqwest::Client::new();

  let res = client
    .put(format!("{}/api/logs", base))
    .body("id=1&message=z")
    .send()
    .await
    .unwrap();
  assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
  assert_eq!(list(&client, &base).await, vec![rec(1, "a")]);
}
