use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::config::LookupSettings;
use crate::app::error::AppError;
use crate::app::lookup::heuristics::{dedup_and_rank, methods_from, search_queries};
use crate::app::models::{RateLimit, ReleaseInfo, RepositorySummary, UnlockMethod};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositorySummary>,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateLimit,
}

/// Community unlock-tool discovery against a GitHub-compatible repository index.
///
/// Every public method is best effort: network, HTTP status and decoding failures are
/// logged and turned into empty or fallback results. Nothing is retried.
pub struct UnlockMethodLookup {
    client: reqwest::Client,
    settings: LookupSettings,
}

impl UnlockMethodLookup {
    pub fn new(settings: LookupSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(settings.user_agent.clone())
            .build()
            .unwrap_or_default();
        Self { client, settings }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        trace_id: &str,
    ) -> Result<T, AppError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request
            .send()
            .await
            .map_err(|err| AppError::network(format!("Request to {url} failed: {err}"), trace_id))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(
                format!("GitHub API error: {}", status.as_u16()),
                trace_id,
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::network(format!("Invalid response from {url}: {err}"), trace_id))
    }

    pub async fn search_repositories(
        &self,
        query: &str,
        trace_id: &str,
    ) -> Result<Vec<RepositorySummary>, AppError> {
        let url = self.endpoint("search/repositories");
        let params = [
            ("q", query.to_string()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", self.settings.per_page.to_string()),
        ];
        let response: SearchResponse = self.get_json(&url, &params, trace_id).await?;
        Ok(response.items)
    }

    /// Runs every keyword query for `brand` and returns relevant repositories as unlock
    /// methods, most starred first. Queries that fail contribute nothing.
    pub async fn fetch_methods(&self, brand: &str, trace_id: &str) -> Vec<UnlockMethod> {
        if brand.trim().is_empty() {
            return Vec::new();
        }
        let mut methods = Vec::new();
        for query in search_queries(brand) {
            match self.search_repositories(&query, trace_id).await {
                Ok(repos) => {
                    debug!(trace_id = %trace_id, query = %query, results = repos.len(), "repository search");
                    methods.extend(methods_from(&repos, brand));
                }
                Err(err) => {
                    warn!(
                        trace_id = %trace_id,
                        query = %query,
                        error = %err.error,
                        "repository search failed"
                    );
                }
            }
        }
        dedup_and_rank(methods)
    }

    pub async fn fetch_latest_release(
        &self,
        repository_url: &str,
        trace_id: &str,
    ) -> Option<ReleaseInfo> {
        let Some((owner, repo)) = owner_and_repo(repository_url) else {
            warn!(trace_id = %trace_id, url = %repository_url, "not a repository url");
            return None;
        };
        let url = self.endpoint(&format!("repos/{owner}/{repo}/releases/latest"));
        match self.get_json::<ReleaseInfo>(&url, &[], trace_id).await {
            Ok(release) => Some(release),
            Err(err) => {
                warn!(trace_id = %trace_id, error = %err.error, "failed to fetch latest release");
                None
            }
        }
    }

    /// Falls back to an exhausted anonymous quota resetting in an hour.
    pub async fn check_rate_limit(&self, trace_id: &str) -> RateLimit {
        let url = self.endpoint("rate_limit");
        match self.get_json::<RateLimitResponse>(&url, &[], trace_id).await {
            Ok(response) => response.rate,
            Err(err) => {
                warn!(trace_id = %trace_id, error = %err.error, "rate limit check failed");
                RateLimit {
                    limit: 60,
                    remaining: 0,
                    reset: Utc::now().timestamp() + 3600,
                }
            }
        }
    }
}

fn owner_and_repo(repository_url: &str) -> Option<(String, String)> {
    let url = reqwest::Url::parse(repository_url).ok()?;
    let mut segments = url.path_segments()?.filter(|segment| !segment.is_empty());
    let owner = segments.next()?.to_string();
    let repo = segments.next()?.trim_end_matches(".git").to_string();
    Some((owner, repo))
}
