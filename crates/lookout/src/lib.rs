//! Lookout resolves keywords to Reddit submissions, caching what it fetches in SQLite.
//!
//! A keyword names a subreddit. The first resolution of a keyword fetches that subreddit's
//! hot listing and stores it; later resolutions answer from the store.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod reddit;
pub mod resolver;
pub mod server;
pub mod storage;

pub use error::{LookoutError, Result};
