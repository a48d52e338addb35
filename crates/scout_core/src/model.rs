use serde::{Deserialize, Serialize};

/// A GitHub account as returned by the user search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub score: f64,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub site_admin: bool,
}

/// A repository owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub updated_at: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Body of `GET /search/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Account>,
}
