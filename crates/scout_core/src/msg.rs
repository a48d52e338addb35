use crate::{Repository, RequestId, SearchUsersResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the query input.
    QueryChanged(String),
    /// User submitted a search for `query`.
    SearchSubmitted { query: String, max_results: u32 },
    /// API resolution of a previously issued search.
    SearchCompleted {
        request_id: RequestId,
        result: Result<SearchUsersResponse, String>,
    },
    /// Explicit request to (re)load the repositories of one row.
    LoadRepositories { login: String, max_items: u32 },
    /// API resolution of a repository listing.
    RepositoriesLoaded {
        login: String,
        result: Result<Vec<Repository>, String>,
    },
    /// User expanded a row in the result list.
    RowToggled { login: String },
    /// User cleared the session.
    ResetClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
