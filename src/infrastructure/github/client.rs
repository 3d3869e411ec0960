//! GitHub REST implementation of RemoteStateClient

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::models::{
    MemberResponse, MembershipRequest, PermissionRequest, RepositoryResponse, TeamRequest,
    TeamResponse,
};
use super::pagination::next_page_url;
use super::retry::RetryConfig;
use crate::config::GithubConfig;
use crate::domain::{DomainError, Permission, RemoteStateClient, TeamAttributes, TeamHandle};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "teamsync";
const MAX_ERROR_BODY: usize = 500;

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    per_page: u32,
    retry: RetryConfig,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, DomainError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::configuration("GitHub token is not configured"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            per_page: config.per_page.clamp(1, 100),
            retry: config.retry.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn team_path(org: &str, slug: &str) -> String {
        format!("/orgs/{}/teams/{}", org, slug)
    }

    /// Send a request, retrying transient failures with backoff
    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, DomainError> {
        let mut attempt = 0;

        loop {
            match self.send_once(method.clone(), url, body).await {
                Err(e) if is_retryable(&method, &e) && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        method = %method,
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient GitHub failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn send_once<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, DomainError> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("{} {}: request timed out", method, url)
            } else if e.is_connect() {
                format!("{} {}: connection failed", method, url)
            } else {
                format!("{} {}: request failed: {}", method, url, e)
            };
            DomainError::remote(None, message)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY)
            .collect();

        if rate_limited {
            return Err(DomainError::remote(
                Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
                format!("{} {}: rate limit exceeded", method, url),
            ));
        }

        Err(DomainError::remote(
            Some(status.as_u16()),
            format!("{} {}: {}", method, url, body),
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DomainError> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        parse_json(response, url).await
    }

    /// Follow `Link: rel="next"` until the last page
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, DomainError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut next = Some(format!(
            "{}{}per_page={}",
            self.url(path),
            separator,
            self.per_page
        ));
        let mut items = Vec::new();
        let mut pages = 0u32;

        while let Some(url) = next {
            let response = self.send::<()>(Method::GET, &url, None).await?;
            next = next_page_url(response.headers());
            let page: Vec<T> = parse_json(response, &url).await?;
            pages += 1;
            debug!(url = %url, items = page.len(), "Fetched page");
            items.extend(page);
        }

        debug!(path = %path, pages, total = items.len(), "Fetched all pages");
        Ok(items)
    }
}

/// A POST that failed without a response may still have been applied, so
/// only answered POSTs are retried.
fn is_retryable(method: &Method, error: &DomainError) -> bool {
    if *method == Method::POST && matches!(error, DomainError::Remote { status: None, .. }) {
        return false;
    }
    error.is_transient()
}

async fn parse_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, DomainError> {
    response
        .json()
        .await
        .map_err(|e| DomainError::remote(None, format!("Failed to parse response from {}: {}", url, e)))
}

#[async_trait]
impl RemoteStateClient for GithubClient {
    async fn find_team_by_slug(
        &self,
        org: &str,
        slug: &str,
    ) -> Result<Option<TeamHandle>, DomainError> {
        let url = self.url(&Self::team_path(org, slug));

        match self.get_json::<TeamResponse>(&url).await {
            Ok(team) => Ok(Some(team.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_team(
        &self,
        org: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        let url = self.url(&format!("/orgs/{}/teams", org));
        let body = TeamRequest::from(attributes);
        let response = self.send(Method::POST, &url, Some(&body)).await?;
        let team: TeamResponse = parse_json(response, &url).await?;
        Ok(team.into())
    }

    async fn update_team(
        &self,
        org: &str,
        slug: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        let url = self.url(&Self::team_path(org, slug));
        let body = TeamRequest::from(attributes);
        let response = self.send(Method::PATCH, &url, Some(&body)).await?;
        let team: TeamResponse = parse_json(response, &url).await?;
        Ok(team.into())
    }

    async fn list_team_members(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<BTreeSet<String>, DomainError> {
        let path = format!("{}/members", Self::team_path(org, team.slug()));
        let members: Vec<MemberResponse> = self.get_all_pages(&path).await?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }

    async fn add_team_member(
        &self,
        org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        let url = self.url(&format!(
            "{}/memberships/{}",
            Self::team_path(org, team.slug()),
            identity
        ));
        let body = MembershipRequest { role: "member" };
        self.send(Method::PUT, &url, Some(&body)).await?;
        Ok(())
    }

    async fn remove_team_member(
        &self,
        org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        let url = self.url(&format!(
            "{}/memberships/{}",
            Self::team_path(org, team.slug()),
            identity
        ));
        self.send::<()>(Method::DELETE, &url, None).await?;
        Ok(())
    }

    async fn list_org_repositories(&self, org: &str) -> Result<Vec<String>, DomainError> {
        let path = format!("/orgs/{}/repos?type=all", org);
        let repositories: Vec<RepositoryResponse> = self.get_all_pages(&path).await?;
        Ok(repositories.into_iter().map(|r| r.name).collect())
    }

    async fn list_team_repositories(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<Vec<String>, DomainError> {
        let path = format!("{}/repos", Self::team_path(org, team.slug()));
        let repositories: Vec<RepositoryResponse> = self.get_all_pages(&path).await?;
        Ok(repositories.into_iter().map(|r| r.name).collect())
    }

    async fn grant_team_repository(
        &self,
        org: &str,
        team: &TeamHandle,
        repository: &str,
        permission: Permission,
    ) -> Result<(), DomainError> {
        let url = self.url(&format!(
            "{}/repos/{}/{}",
            Self::team_path(org, team.slug()),
            org,
            repository
        ));
        let body = PermissionRequest::from(permission);
        self.send(Method::PUT, &url, Some(&body)).await?;
        Ok(())
    }

    async fn revoke_team_repository(
        &self,
        org: &str,
        team: &TeamHandle,
        repository: &str,
    ) -> Result<(), DomainError> {
        let url = self.url(&format!(
            "{}/repos/{}/{}",
            Self::team_path(org, team.slug()),
            org,
            repository
        ));
        self.send::<()>(Method::DELETE, &url, None).await?;
        Ok(())
    }
}
