use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use scout_core::{Repository, SearchUsersResponse};
use scout_logging::{mask_secret, scout_debug, scout_info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, FailureKind, PageParams};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";
pub const CLIENT_USER_AGENT: &str = "github-scout";

/// Environment variables consulted for the API credential, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub accept: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub token: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept: GITHUB_V3_ACCEPT.to_string(),
            user_agent: CLIENT_USER_AGENT.to_string(),
            request_timeout: Duration::from_millis(10_000),
            token: None,
        }
    }
}

impl ClientSettings {
    /// Default settings with the credential taken from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_token_from(|key| std::env::var(key).ok())
    }

    /// Fills `token` from the first non-blank value `lookup` yields for
    /// [`TOKEN_ENV_VARS`]. Leaves it untouched when none is found.
    pub fn with_token_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let found = TOKEN_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());
        if found.is_some() {
            self.token = found;
        }
        self
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("accept", &self.accept)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .field("token", &self.token.as_deref().map(mask_secret))
            .finish()
    }
}

/// The two GitHub operations the search session needs.
///
/// Implementations return failures as received; they never retry.
#[async_trait::async_trait]
pub trait GithubApi: Send + Sync {
    async fn search_users(
        &self,
        query: &str,
        page: PageParams,
    ) -> Result<SearchUsersResponse, ApiError>;

    async fn list_repositories(
        &self,
        login: &str,
        page: PageParams,
    ) -> Result<Vec<Repository>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGithubClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestGithubClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&settings.accept)?);
        headers.insert(USER_AGENT, header_value(&settings.user_agent)?);
        if let Some(token) = settings.token.as_deref() {
            let mut value = header_value(&format!("token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Config, err.to_string()))?;

        scout_info!(
            "GitHub client base_url={} timeout_ms={} token={}",
            base_url,
            settings.request_timeout.as_millis(),
            settings
                .token
                .as_deref()
                .map(mask_secret)
                .unwrap_or_else(|| "none".to_string())
        );

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be used as a base url", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        scout_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl GithubApi for ReqwestGithubClient {
    async fn search_users(
        &self,
        query: &str,
        page: PageParams,
    ) -> Result<SearchUsersResponse, ApiError> {
        let url = self.endpoint(
            &["search", "users"],
            &[
                ("q", query.to_string()),
                ("page", page.page.to_string()),
                ("per_page", page.per_page.to_string()),
            ],
        )?;
        self.get_json(url).await
    }

    async fn list_repositories(
        &self,
        login: &str,
        page: PageParams,
    ) -> Result<Vec<Repository>, ApiError> {
        let url = self.endpoint(
            &["users", login, "repos"],
            &[
                ("page", page.page.to_string()),
                ("per_page", page.per_page.to_string()),
            ],
        )?;
        self.get_json(url).await
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(raw).map_err(|err| ApiError::new(FailureKind::Config, err.to_string()))
}

#[derive(Deserialize)]
struct GithubErrorBody {
    message: String,
}

fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<GithubErrorBody>(body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    let message = match detail {
        Some(detail) => format!("{status}: {detail}"),
        None => status.to_string(),
    };
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_api() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "https://api.github.com");
        assert_eq!(settings.accept, "application/vnd.github.v3+json");
        assert_eq!(settings.request_timeout, Duration::from_millis(10_000));
        assert_eq!(settings.token, None);
    }

    #[test]
    fn token_lookup_prefers_first_non_blank_variable() {
        let settings = ClientSettings::default().with_token_from(|key| match key {
            "GITHUB_TOKEN" => Some("   ".to_string()),
            "GH_TOKEN" => Some("ghp_secret".to_string()),
            _ => None,
        });
        assert_eq!(settings.token.as_deref(), Some("ghp_secret"));

        let settings = ClientSettings::default().with_token_from(|_| None);
        assert_eq!(settings.token, None);
    }

    #[test]
    fn debug_output_masks_token() {
        let settings = ClientSettings {
            token: Some("ghp_abcdef123456".to_string()),
            ..ClientSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("ghp_abcdef"));
        assert!(rendered.contains("3456"));
    }

    #[test]
    fn endpoint_encodes_login_as_single_segment() {
        let client = ReqwestGithubClient::new(ClientSettings {
            base_url: "https://ghe.example.com/api/v3/".to_string(),
            ..ClientSettings::default()
        })
        .expect("client");

        let url = client
            .endpoint(&["users", "we/ird", "repos"], &[("page", "1".to_string())])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/users/we%2Fird/repos?page=1"
        );
    }

    #[test]
    fn status_error_appends_github_message() {
        let err = status_error(
            StatusCode::FORBIDDEN,
            br#"{"message":"API rate limit exceeded"}"#,
        );
        assert_eq!(err.kind, FailureKind::HttpStatus(403));
        assert_eq!(err.message, "403 Forbidden: API rate limit exceeded");

        let err = status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(err.to_string(), "404 Not Found");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = ReqwestGithubClient::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
