use crate::view_model::{AppViewModel, RowView};
use crate::{Account, Repository};

/// Identifies one issued search; only the most recent one may land.
pub type RequestId = u64;

/// Number of accounts requested per search unless the caller overrides it.
pub const DEFAULT_MAX_RESULTS: u32 = 5;
/// Page size used when a row expansion triggers a repository load.
pub const REPOSITORY_PAGE_SIZE: u32 = 100;

/// Lazy-load status of a single result row.
///
/// `Loaded` and `Failed` both leave the repository list possibly empty; the
/// variant tells "account has no repositories" apart from "fetch failed".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// One account in the result list together with its lazily loaded repositories.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    account: Account,
    repositories: Vec<Repository>,
    status: RowStatus,
}

impl ResultRow {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            repositories: Vec::new(),
            status: RowStatus::Idle,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn login(&self) -> &str {
        &self.account.login
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn status(&self) -> &RowStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == RowStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RowStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// True when expanding this row should issue a repository fetch.
    pub fn needs_fetch(&self) -> bool {
        matches!(self.status, RowStatus::Idle | RowStatus::Failed(_))
    }

    fn start_loading(&mut self) {
        self.status = RowStatus::Loading;
    }

    fn finish_loading(&mut self, repositories: Vec<Repository>) {
        self.repositories = repositories;
        self.status = RowStatus::Loaded;
    }

    fn fail_loading(&mut self, message: String) {
        self.repositories = Vec::new();
        self.status = RowStatus::Failed(message);
    }

    fn view(&self) -> RowView {
        RowView {
            account: self.account.clone(),
            repositories: self.repositories.clone(),
            loading: self.is_loading(),
            loaded: self.status == RowStatus::Loaded,
            error: self.error().map(ToOwned::to_owned),
        }
    }
}

/// The search session: query, status flags and the current result rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    query: String,
    is_searching: bool,
    has_searched: bool,
    search_error: Option<String>,
    rows: Vec<ResultRow>,
    latest_request: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query: self.query.clone(),
            is_searching: self.is_searching,
            has_searched: self.has_searched,
            search_error: self.search_error.clone(),
            rows: self.rows.iter().map(ResultRow::view).collect(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn search_error(&self) -> Option<&str> {
        self.search_error.as_deref()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn row(&self, login: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.login() == login)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_search(&mut self, query: String) -> RequestId {
        self.latest_request += 1;
        self.query = query;
        self.is_searching = true;
        self.has_searched = true;
        self.search_error = None;
        self.mark_dirty();
        self.latest_request
    }

    pub(crate) fn is_current_request(&self, request_id: RequestId) -> bool {
        self.is_searching && self.latest_request == request_id
    }

    /// Replaces the rows with fresh ones, keeping the first row per login.
    pub(crate) fn apply_search_results(&mut self, accounts: Vec<Account>) {
        let mut rows: Vec<ResultRow> = Vec::with_capacity(accounts.len());
        for account in accounts {
            if rows.iter().any(|row| row.login() == account.login) {
                continue;
            }
            rows.push(ResultRow::new(account));
        }
        self.rows = rows;
        self.is_searching = false;
        self.search_error = None;
        self.mark_dirty();
    }

    pub(crate) fn fail_search(&mut self, message: String) {
        self.rows = Vec::new();
        self.is_searching = false;
        self.search_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn begin_row_load(&mut self, login: &str) -> bool {
        self.patch_row(login, ResultRow::start_loading)
    }

    pub(crate) fn finish_row_load(&mut self, login: &str, repositories: Vec<Repository>) -> bool {
        self.patch_row(login, |row| row.finish_loading(repositories))
    }

    pub(crate) fn fail_row_load(&mut self, login: &str, message: String) -> bool {
        self.patch_row(login, |row| row.fail_loading(message))
    }

    /// Restores the initial session. The request counter keeps counting so a
    /// search issued before the reset can never land afterwards.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            latest_request: self.latest_request,
            dirty: true,
            ..Self::default()
        };
    }

    fn patch_row(&mut self, login: &str, patch: impl FnOnce(&mut ResultRow)) -> bool {
        match self.rows.iter_mut().find(|row| row.login() == login) {
            Some(row) => {
                patch(row);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }
}
