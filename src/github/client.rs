use async_trait::async_trait;
use reqwest::{header, Client, Response};

use crate::config::DEFAULT_API_URL;
use crate::error::{DegradedFetch, Error, Result};
use crate::github::graphql::{
    CalendarFetch, ContributionQueryVariables, GraphQLRequest, GraphQLResponse, CONTRIBUTIONS_QUERY,
};
use crate::github::rate_limiter::RateLimiter;
use crate::github::source::StatsSource;
use crate::models::{Profile, RepositorySummary};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("github-stats/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_user(&self, username: &str) -> Result<Profile> {
        self.rate_limiter.check()?;
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers());

        let response = ensure_success(response, || format!("Failed to fetch user {}", username)).await?;
        Ok(response.json().await?)
    }

    /// First page only: the 100 most recently updated repositories.
    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<RepositorySummary>> {
        self.rate_limiter.check()?;
        let url = format!("{}/users/{}/repos?sort=updated&per_page=100", self.base_url, username);
        tracing::info!("Fetching repositories for: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers());

        let response =
            ensure_success(response, || format!("Failed to fetch repositories for {}", username)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_contribution_calendar(&self, username: &str, token: Option<&str>) -> CalendarFetch {
        let url = format!("{}/graphql", self.base_url);
        tracing::debug!("Querying contribution calendar for: {}", username);

        let body = GraphQLRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: ContributionQueryVariables { username },
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let outcome = match request.send().await {
            Err(e) => CalendarFetch::Degraded(DegradedFetch::Transport(e.to_string())),
            Ok(response) if !response.status().is_success() => {
                CalendarFetch::Degraded(DegradedFetch::Status(response.status().as_u16()))
            }
            Ok(response) => match response.json::<GraphQLResponse>().await {
                Err(e) => CalendarFetch::Degraded(DegradedFetch::Malformed(e.to_string())),
                Ok(parsed) => match parsed.into_calendar() {
                    Some(calendar) => CalendarFetch::Fetched(calendar),
                    None => CalendarFetch::Degraded(DegradedFetch::MissingCalendar),
                },
            },
        };

        if let CalendarFetch::Degraded(ref reason) = outcome {
            tracing::warn!("Contribution data unavailable for {}, using empty calendar: {}", username, reason);
        }

        outcome
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

async fn ensure_success<F>(response: Response, context: F) -> Result<Response>
where
    F: FnOnce() -> String,
{
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        message: format!("{}: {} - {}", context(), status, body),
    })
}

#[async_trait]
impl StatsSource for GitHubClient {
    async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        self.get_user(username).await
    }

    async fn fetch_repositories(&self, username: &str) -> Result<Vec<RepositorySummary>> {
        self.get_user_repos(username).await
    }

    async fn fetch_contribution_calendar(&self, username: &str, credential: Option<&str>) -> CalendarFetch {
        self.get_contribution_calendar(username, credential).await
    }
}
