//! GitHub REST API client
//!
//! Implements the remote state client against `api.github.com` (or a GitHub
//! Enterprise base URL). List endpoints are followed through every page and
//! transient failures are retried with exponential backoff.

mod client;
mod models;
mod pagination;
mod retry;

pub use client::GithubClient;
pub use pagination::next_page_url;
pub use retry::RetryConfig;
