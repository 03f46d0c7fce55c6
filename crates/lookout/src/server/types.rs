//! REST API types with schemars annotations for OpenAPI generation

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AuditLogRecord, KeywordRecord, ResultRecord};

// Base Response Structure
// ======================

/// Base response object for all API endpoints
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  /// Additional error context
  #[serde(default)]
  pub context: serde_json::Value,
}

// Status/Version Endpoints
// =======================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,

  /// Database file in use; absent for in-memory databases
  pub database_path: Option<String>,

  pub version: String,

  /// Number of credential replacements since startup
  pub credential_epoch: u64,

  /// Whether a Reddit client is currently built and cached
  pub client_ready: bool,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

/// Response for /api endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiInfoResponse {
  pub latest: String,
  pub versions: ApiVersions,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiVersions {
  pub latest: String,
  pub active: Vec<String>,
}

// Credentials Endpoint
// ====================

/// Request for POST /reddit_credentials
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CredentialsRequest {
  pub client_id: String,
  pub client_secret: String,
  pub user_agent: String,
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
  pub message: String,
}

// Audit Log Endpoint
// ==================

/// One captured Reddit client diagnostic event
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PrawLog {
  pub id: i64,
  pub log: String,
  pub timestamp: DateTime<Utc>,
}

impl From<AuditLogRecord> for PrawLog {
  fn from(record: AuditLogRecord) -> Self {
    Self { id: record.id, log: record.message, timestamp: record.timestamp }
  }
}

/// Response for GET /praw_logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<PrawLog>,
}

// Keyword Endpoints
// =================

/// Query for GET /keyword_data
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDataQuery {
  /// Keyword to resolve; also the subreddit fetched on a cache miss
  pub keyword: Option<String>,

  /// Required when the keyword has not been seen before
  pub account_name: Option<String>,

  /// Required when the keyword has not been seen before
  pub industry: Option<String>,
}

/// A stored subreddit submission
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SubredditPost {
  pub id: i64,
  pub subreddit: String,
  pub comment: String,
  pub created_date: DateTime<Utc>,
  pub author: String,
  pub title: String,
  pub keyword_data_id: i64,
}

impl From<ResultRecord> for SubredditPost {
  fn from(record: ResultRecord) -> Self {
    Self {
      id: record.id,
      subreddit: record.source_name,
      comment: record.body,
      created_date: record.published_at,
      author: record.author,
      title: record.title,
      keyword_data_id: record.keyword_id,
    }
  }
}

/// Response for GET /keyword_data
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDataResponse {
  pub results: Vec<SubredditPost>,
}

/// Request for POST /keyword_data
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RegisterKeywordRequest {
  pub keyword: String,
  #[serde(default)]
  pub account_name: Option<String>,
  #[serde(default)]
  pub industry: Option<String>,
}

/// A stored keyword
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KeywordData {
  pub id: i64,
  pub keyword: String,
  pub account_name: Option<String>,
  pub industry: Option<String>,
  pub timestamp: DateTime<Utc>,
}

impl From<KeywordRecord> for KeywordData {
  fn from(record: KeywordRecord) -> Self {
    Self {
      id: record.id,
      keyword: record.keyword,
      account_name: record.account_name,
      industry: record.industry,
      timestamp: record.created_at,
    }
  }
}

/// Response for POST /keyword_data
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KeywordResponse {
  pub keyword: KeywordData,
}

// Helper Functions
// ================

fn current_version() -> VersionInfo {
  let version = env!("CARGO_PKG_VERSION");
  VersionInfo { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
}

impl<T> BaseResponse<T> {
  /// Create a successful response
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: current_version(), transaction_id, errors: Vec::new(), data }
  }

  /// Create an error response
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: current_version(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string(), context: serde_json::Value::Null }
  }
}
