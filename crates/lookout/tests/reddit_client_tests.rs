use lookout::error::LookoutError;
use lookout::models::CredentialSet;
use lookout::reddit::{AuditSink, ContentClient, DiagnosticChannel, RedditClient, RedditClientFactory, RedditEndpoints};
use lookout::server::AppState;
use lookout::storage::Database;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod listing_data {
  use serde_json::{json, Value};

  pub fn child(subreddit: &str, title: &str, selftext: &str, author: &str) -> Value {
    json!({
      "kind": "t3",
      "data": {
        "subreddit": subreddit,
        "selftext": selftext,
        "created_utc": 1700000000.0,
        "author": author,
        "title": title,
        "ups": 42,
        "permalink": format!("/r/{subreddit}/comments/abc/"),
      }
    })
  }

  pub fn listing(children: Vec<Value>) -> Value {
    json!({"kind": "Listing", "data": {"after": null, "dist": children.len(), "children": children}})
  }
}

#[derive(Default)]
struct RecordingSink {
  messages: Mutex<Vec<String>>,
}

impl AuditSink for RecordingSink {
  fn record(&self, message: &str) {
    self.messages.lock().unwrap().push(message.to_string());
  }
}

fn endpoints(server: &MockServer) -> RedditEndpoints {
  RedditEndpoints { auth_url: format!("{}/api/v1/access_token", server.uri()), api_url: server.uri() }
}

fn credentials() -> CredentialSet {
  CredentialSet::new("client-id", "client-secret", "lookout-tests/1.0")
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
  Mock::given(method("POST"))
    .and(path("/api/v1/access_token"))
    .and(header_exists("authorization"))
    .and(body_string_contains("grant_type=client_credentials"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!({"access_token": "token-123", "token_type": "bearer", "expires_in": 86400, "scope": "*"})),
    )
    .expect(expected_calls)
    .mount(server)
    .await;
}

async fn mount_listing(server: &MockServer, subreddit: &str, body: Value) {
  Mock::given(method("GET"))
    .and(path(format!("/r/{subreddit}/hot")))
    .and(header("authorization", "Bearer token-123"))
    .and(header("user-agent", "lookout-tests/1.0"))
    .and(query_param("raw_json", "1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(body))
    .mount(server)
    .await;
}

#[tokio::test]
async fn test_hot_authenticates_and_decodes_listing() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;
  mount_listing(
    &server,
    "golang",
    listing_data::listing(vec![
      listing_data::child("golang", "Weekly thread", "", "gopher"),
      listing_data::child("golang", "Deleted post", "text", "[deleted]"),
    ]),
  )
  .await;

  let client = RedditClient::new(credentials(), endpoints(&server), DiagnosticChannel::new()).unwrap();

  let submissions = client.hot("golang", 10).await.unwrap();
  assert_eq!(submissions.len(), 2);
  assert_eq!(submissions[0].title, "Weekly thread");
  assert_eq!(submissions[0].selftext, None);
  assert_eq!(submissions[0].author.as_deref(), Some("gopher"));
  assert_eq!(submissions[1].author, None);

  // The token is reused for the second listing
  client.hot("golang", 10).await.unwrap();
}

#[tokio::test]
async fn test_hot_respects_limit() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;
  let children = (0..5).map(|i| listing_data::child("rust", &format!("Post {i}"), "body", "ferris")).collect();
  Mock::given(method("GET"))
    .and(path("/r/rust/hot"))
    .and(query_param("limit", "3"))
    .respond_with(ResponseTemplate::new(200).set_body_json(listing_data::listing(children)))
    .mount(&server)
    .await;

  let client = RedditClient::new(credentials(), endpoints(&server), DiagnosticChannel::new()).unwrap();

  assert_eq!(client.hot("rust", 3).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_rejected_credentials_are_an_auth_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/v1/access_token"))
    .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized", "error": 401})))
    .mount(&server)
    .await;

  let client = RedditClient::new(credentials(), endpoints(&server), DiagnosticChannel::new()).unwrap();

  assert!(matches!(client.hot("golang", 10).await, Err(LookoutError::ExternalAuth { .. })));
}

#[tokio::test]
async fn test_grant_error_payload_is_an_auth_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/v1/access_token"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_grant"})))
    .mount(&server)
    .await;

  let client = RedditClient::new(credentials(), endpoints(&server), DiagnosticChannel::new()).unwrap();

  assert!(matches!(client.hot("golang", 10).await, Err(LookoutError::ExternalAuth { .. })));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_a_fetch_error() {
  // Reserve a port, then close it so nothing is listening there
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let endpoints =
    RedditEndpoints { auth_url: format!("http://{addr}/api/v1/access_token"), api_url: format!("http://{addr}") };
  let client = RedditClient::new(credentials(), endpoints, DiagnosticChannel::new()).unwrap();

  assert!(matches!(client.hot("golang", 10).await, Err(LookoutError::ExternalFetch { .. })));
}

#[tokio::test]
async fn test_listing_failures_are_fetch_errors() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;
  Mock::given(method("GET"))
    .and(path("/r/private/hot"))
    .respond_with(ResponseTemplate::new(403).set_body_json(json!({"reason": "private", "error": 403})))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/r/garbled/hot"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
    .mount(&server)
    .await;

  let client = RedditClient::new(credentials(), endpoints(&server), DiagnosticChannel::new()).unwrap();

  assert!(matches!(client.hot("private", 10).await, Err(LookoutError::ExternalFetch { .. })));
  assert!(matches!(client.hot("garbled", 10).await, Err(LookoutError::ExternalFetch { .. })));
}

#[tokio::test]
async fn test_requests_are_announced_on_the_diagnostic_channel() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;
  mount_listing(&server, "golang", listing_data::listing(vec![])).await;

  let sink = Arc::new(RecordingSink::default());
  let diagnostics = DiagnosticChannel::new();
  diagnostics.attach(sink.clone());
  let client = RedditClient::new(credentials(), endpoints(&server), diagnostics).unwrap();

  client.hot("golang", 10).await.unwrap();

  let messages = sink.messages.lock().unwrap().clone();
  assert_eq!(messages.len(), 4);
  assert!(messages[0].starts_with("Fetching: POST"));
  assert!(messages[1].starts_with("Response: 200"));
  assert!(messages[2].starts_with(&format!("Fetching: GET {}/r/golang/hot?limit=10&raw_json=1", server.uri())));
  assert!(messages[3].starts_with("Response: 200"));
  assert!(messages.iter().all(|m| !m.contains("client-secret")));
}

#[tokio::test]
async fn test_end_to_end_resolution_over_http() {
  let server = MockServer::start().await;
  mount_token(&server, 1).await;
  mount_listing(
    &server,
    "golang",
    listing_data::listing(vec![listing_data::child("golang", "Go 1.22 released", "", "[deleted]")]),
  )
  .await;

  let state = AppState::assemble(
    Database::open_in_memory().unwrap(),
    credentials(),
    Arc::new(RedditClientFactory::new(endpoints(&server))),
    10,
  );

  let results = state.service.resolve("golang", Some("Acme"), Some("Tech")).await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].body, "No comments");
  assert_eq!(results[0].author, "Unknown");

  let again = state.service.resolve("golang", None, None).await.unwrap();
  assert_eq!(again, results);

  let logs = state.audit_log.list_all().unwrap();
  assert_eq!(logs.len(), 4);
}
