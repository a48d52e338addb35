use crate::{Account, Repository};

/// Render-ready snapshot of the search session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub is_searching: bool,
    pub has_searched: bool,
    pub search_error: Option<String>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub account: Account,
    pub repositories: Vec<Repository>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

impl AppViewModel {
    pub fn row(&self, login: &str) -> Option<&RowView> {
        self.rows.iter().find(|row| row.account.login == login)
    }

    /// True when a finished search produced no rows and no error.
    pub fn is_empty_result(&self) -> bool {
        self.has_searched
            && !self.is_searching
            && self.search_error.is_none()
            && self.rows.is_empty()
    }
}
