//! Reddit's OAuth API over reqwest, using the application-only (client credentials) grant

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use super::{ContentClient, DiagnosticChannel, Submission};
use crate::error::{LookoutError, Result};
use crate::models::CredentialSet;

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
const DELETED_AUTHOR: &str = "[deleted]";

/// Where the client authenticates and where it reads listings from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditEndpoints {
  pub auth_url: String,
  pub api_url: String,
}

impl Default for RedditEndpoints {
  fn default() -> Self {
    Self { auth_url: DEFAULT_AUTH_URL.to_string(), api_url: DEFAULT_API_URL.to_string() }
  }
}

struct AccessToken {
  value: String,
  expires_at: Instant,
}

pub struct RedditClient {
  http: reqwest::Client,
  credentials: CredentialSet,
  endpoints: RedditEndpoints,
  diagnostics: DiagnosticChannel,
  token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
  /// Build a client. Only the shape of the credentials is checked here; Reddit judges
  /// whether they are valid on first use.
  pub fn new(
    credentials: CredentialSet,
    endpoints: RedditEndpoints,
    diagnostics: DiagnosticChannel,
  ) -> Result<Self> {
    require_present("client_id", &credentials.client_id)?;
    require_present("client_secret", &credentials.client_secret)?;
    require_present("user_agent", &credentials.user_agent)?;

    HeaderValue::from_str(&credentials.user_agent)
      .map_err(|_| LookoutError::external_auth("user_agent is not a valid header value"))?;
    for (name, value) in [("auth_url", &endpoints.auth_url), ("api_url", &endpoints.api_url)] {
      Url::parse(value).map_err(|e| LookoutError::external_auth(format!("invalid {name} '{value}': {e}")))?;
    }

    let http = reqwest::Client::builder()
      .user_agent(credentials.user_agent.clone())
      .build()
      .map_err(|e| LookoutError::external_auth(format!("failed to build HTTP client: {e}")))?;

    Ok(Self { http, credentials, endpoints, diagnostics, token: Mutex::new(None) })
  }

  /// `{api_url}/r/{subreddit}/hot?limit={limit}&raw_json=1`, with the name percent-encoded
  pub fn listing_url(&self, subreddit: &str, limit: usize) -> Result<Url> {
    let mut url = Url::parse(&self.endpoints.api_url)
      .map_err(|e| LookoutError::external_fetch(format!("invalid api_url: {e}")))?;

    url
      .path_segments_mut()
      .map_err(|_| LookoutError::external_fetch("api_url cannot carry a path"))?
      .pop_if_empty()
      .extend(["r", subreddit, "hot"]);
    url.query_pairs_mut().append_pair("limit", &limit.to_string()).append_pair("raw_json", "1");

    Ok(url)
  }

  async fn access_token(&self) -> Result<String> {
    let mut cached = self.token.lock().await;
    if let Some(token) = cached.as_ref() {
      if Instant::now() < token.expires_at {
        return Ok(token.value.clone());
      }
    }

    let fresh = self.request_token().await?;
    let value = fresh.value.clone();
    *cached = Some(fresh);
    Ok(value)
  }

  async fn request_token(&self) -> Result<AccessToken> {
    self.diagnostics.emit(&format!("Fetching: POST {} at {}", self.endpoints.auth_url, epoch_now()));

    let response = self
      .http
      .post(&self.endpoints.auth_url)
      .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
      .form(&[("grant_type", "client_credentials")])
      .send()
      .await
      .map_err(|e| LookoutError::external_fetch(format!("token request failed: {e}")))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LookoutError::external_fetch(format!("failed to read token response: {e}")))?;
    self.diagnostics.emit(&format!("Response: {} ({} bytes)", status.as_u16(), body.len()));

    if !status.is_success() {
      return Err(LookoutError::external_auth(format!("token request rejected with HTTP {status}")));
    }
    parse_token(&body, Instant::now())
  }
}

#[async_trait]
impl ContentClient for RedditClient {
  async fn hot(&self, subreddit: &str, limit: usize) -> Result<Vec<Submission>> {
    let token = self.access_token().await?;
    let url = self.listing_url(subreddit, limit)?;

    self.diagnostics.emit(&format!("Fetching: GET {url} at {}", epoch_now()));
    let response = self
      .http
      .get(url)
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| LookoutError::external_fetch(format!("listing request failed: {e}")))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LookoutError::external_fetch(format!("failed to read listing: {e}")))?;
    self.diagnostics.emit(&format!("Response: {} ({} bytes)", status.as_u16(), body.len()));

    if status == reqwest::StatusCode::UNAUTHORIZED {
      // Force a new grant on the next call
      self.token.lock().await.take();
    }
    if !status.is_success() {
      return Err(LookoutError::external_fetch(format!(
        "listing for r/{subreddit} returned HTTP {status}"
      )));
    }

    let mut submissions = decode_listing(&body)?;
    submissions.truncate(limit);
    Ok(submissions)
  }
}

#[derive(Deserialize)]
struct TokenResponse {
  #[serde(default)]
  access_token: Option<String>,
  #[serde(default)]
  expires_in: Option<u64>,
  #[serde(default)]
  error: Option<serde_json::Value>,
}

fn parse_token(body: &str, now: Instant) -> Result<AccessToken> {
  let parsed: TokenResponse = serde_json::from_str(body)
    .map_err(|e| LookoutError::external_auth(format!("undecodable token response: {e}")))?;

  if let Some(error) = parsed.error {
    return Err(LookoutError::external_auth(format!("token request rejected: {error}")));
  }

  let value = parsed
    .access_token
    .filter(|token| !token.is_empty())
    .ok_or_else(|| LookoutError::external_auth("token response carried no access_token"))?;
  let lifetime = Duration::from_secs(parsed.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));

  Ok(AccessToken { value, expires_at: now + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN) })
}

#[derive(Deserialize)]
struct Listing {
  data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
  #[serde(default)]
  children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
  data: ListingSubmission,
}

#[derive(Deserialize)]
struct ListingSubmission {
  subreddit: String,
  #[serde(default)]
  selftext: Option<String>,
  created_utc: f64,
  #[serde(default)]
  author: Option<String>,
  #[serde(default)]
  title: String,
}

/// Decode a listing body. Empty self text and deleted authors come back as `None`.
pub fn decode_listing(body: &str) -> Result<Vec<Submission>> {
  let listing: Listing = serde_json::from_str(body)
    .map_err(|e| LookoutError::external_fetch(format!("undecodable listing: {e}")))?;

  Ok(
    listing
      .data
      .children
      .into_iter()
      .map(|child| {
        let data = child.data;
        Submission {
          subreddit: data.subreddit,
          selftext: data.selftext.filter(|text| !text.is_empty()),
          created_utc: data.created_utc,
          author: data.author.filter(|name| !name.is_empty() && name != DELETED_AUTHOR),
          title: data.title,
        }
      })
      .collect(),
  )
}

fn require_present(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(LookoutError::external_auth(format!("{field} is required")));
  }
  Ok(())
}

fn epoch_now() -> f64 {
  chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
