//! Scout engine: GitHub API access and execution of core effects.
mod client;
mod store;
mod types;

pub use client::{
    ClientSettings, GithubApi, ReqwestGithubClient, CLIENT_USER_AGENT, DEFAULT_BASE_URL,
    GITHUB_V3_ACCEPT, TOKEN_ENV_VARS,
};
pub use store::SearchStore;
pub use types::{ApiError, FailureKind, PageParams};
