//! Server configuration from command-line arguments and environment variables

use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::models::CredentialSet;
use crate::reddit::client::{DEFAULT_API_URL, DEFAULT_AUTH_URL};
use crate::reddit::RedditEndpoints;
use crate::resolver::DEFAULT_FETCH_LIMIT;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_CLIENT_ID: &str = "default_client_id";
pub const DEFAULT_CLIENT_SECRET: &str = "default_client_secret";
pub const DEFAULT_USER_AGENT: &str = "default_user_agent";

#[derive(Parser, Debug, Clone)]
#[command(name = "lookout_server")]
#[command(about = "Keyword to subreddit lookup server, backed by a SQLite cache")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
pub struct Args {
  /// Server bind address
  #[arg(long, env = "LOOKOUT_BIND", default_value = DEFAULT_BIND)]
  pub bind: SocketAddr,

  /// SQLite database file (defaults to ~/.lookout/lookout.db)
  #[arg(long, env = "LOOKOUT_DATABASE")]
  pub database: Option<PathBuf>,

  /// Reddit application client id
  #[arg(long, env = "REDDIT_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
  pub client_id: String,

  /// Reddit application client secret
  #[arg(long, env = "REDDIT_CLIENT_SECRET", default_value = DEFAULT_CLIENT_SECRET, hide_env_values = true)]
  pub client_secret: String,

  /// User agent sent to Reddit
  #[arg(long, env = "REDDIT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
  pub user_agent: String,

  /// Reddit OAuth token endpoint
  #[arg(long, env = "REDDIT_AUTH_URL", default_value = DEFAULT_AUTH_URL, hide = true)]
  pub auth_url: String,

  /// Reddit API base URL
  #[arg(long, env = "REDDIT_API_URL", default_value = DEFAULT_API_URL, hide = true)]
  pub api_url: String,

  /// Enable verbose logging
  #[arg(short, long)]
  pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub bind: SocketAddr,
  pub database_path: PathBuf,
  pub credentials: CredentialSet,
  pub endpoints: RedditEndpoints,
  pub fetch_limit: usize,
  pub verbose: bool,
}

impl From<Args> for Config {
  fn from(args: Args) -> Self {
    Self {
      bind: args.bind,
      database_path: args.database.unwrap_or_else(default_database_path),
      credentials: CredentialSet::new(args.client_id, args.client_secret, args.user_agent),
      endpoints: RedditEndpoints { auth_url: args.auth_url, api_url: args.api_url },
      fetch_limit: DEFAULT_FETCH_LIMIT,
      verbose: args.verbose,
    }
  }
}

/// `~/.lookout/lookout.db`, or under /tmp when there is no home directory
pub fn default_database_path() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_else(|| Path::new("/tmp").to_path_buf())
    .join(".lookout")
    .join("lookout.db")
}
