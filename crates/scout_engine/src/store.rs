//! The search session store: owns the single [`AppState`] and runs the
//! effects `scout_core::update` asks for against a [`GithubApi`].
//!
//! State is published copy-on-write. Every mutation takes the current
//! snapshot, applies one message, and swaps a new `Arc` in under the lock,
//! so a snapshot held by a reader never changes underneath it. The lock is
//! never held across a network call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scout_core::{
    update, AppState, AppViewModel, Effect, Msg, DEFAULT_MAX_RESULTS, REPOSITORY_PAGE_SIZE,
};
use scout_logging::{scout_debug, scout_info, scout_warn};

use crate::{GithubApi, PageParams};

pub struct SearchStore {
    api: Arc<dyn GithubApi>,
    state: Mutex<Arc<AppState>>,
}

impl SearchStore {
    pub fn new(api: Arc<dyn GithubApi>) -> Self {
        Self {
            api,
            state: Mutex::new(Arc::new(AppState::new())),
        }
    }

    /// Current immutable snapshot of the session.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.lock())
    }

    pub fn view(&self) -> AppViewModel {
        self.snapshot().view()
    }

    /// Returns whether the session changed since the last call.
    pub fn consume_dirty(&self) -> bool {
        let mut guard = self.lock();
        if !guard.is_dirty() {
            return false;
        }
        Arc::make_mut(&mut *guard).consume_dirty()
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.dispatch(Msg::QueryChanged(text.into()));
    }

    /// Searches with the default result limit.
    pub async fn search(&self, query: &str) {
        self.search_with_limit(query, DEFAULT_MAX_RESULTS).await;
    }

    pub async fn search_with_limit(&self, query: &str, max_results: u32) {
        let effects = self.dispatch(Msg::SearchSubmitted {
            query: query.to_string(),
            max_results,
        });
        self.run_effects(effects).await;
    }

    /// Loads the first page of repositories for `login`, if such a row exists.
    pub async fn load_repositories(&self, login: &str) {
        self.load_repositories_with_limit(login, REPOSITORY_PAGE_SIZE)
            .await;
    }

    pub async fn load_repositories_with_limit(&self, login: &str, max_items: u32) {
        let effects = self.dispatch(Msg::LoadRepositories {
            login: login.to_string(),
            max_items,
        });
        self.run_effects(effects).await;
    }

    /// Handles a row being expanded. Returns `true` when a fetch was issued;
    /// rows that are loading or already loaded are left alone.
    pub async fn toggle_row_expansion(&self, login: &str) -> bool {
        let effects = self.dispatch(Msg::RowToggled {
            login: login.to_string(),
        });
        let fetched = !effects.is_empty();
        self.run_effects(effects).await;
        fetched
    }

    pub fn reset(&self) {
        scout_info!("Session reset");
        self.dispatch(Msg::ResetClicked);
    }

    fn lock(&self) -> MutexGuard<'_, Arc<AppState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock();
        let current = Arc::unwrap_or_clone(std::mem::take(&mut *guard));
        let (next, effects) = update(current, msg);
        *guard = Arc::new(next);
        effects
    }

    async fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            // Completion messages never produce further effects.
            let follow_up = match effect {
                Effect::SearchUsers {
                    request_id,
                    query,
                    per_page,
                } => {
                    scout_info!(
                        "Search request_id={} query={:?} per_page={}",
                        request_id,
                        query,
                        per_page
                    );
                    let result = self
                        .api
                        .search_users(&query, PageParams::first(per_page))
                        .await
                        .map_err(|err| {
                            scout_warn!(
                                "Search request_id={} failed: {} ({})",
                                request_id,
                                err,
                                err.kind
                            );
                            err.to_string()
                        });
                    if let Ok(response) = &result {
                        scout_debug!(
                            "Search request_id={} returned {} of {} accounts",
                            request_id,
                            response.items.len(),
                            response.total_count
                        );
                    }
                    self.dispatch(Msg::SearchCompleted { request_id, result })
                }
                Effect::FetchRepositories { login, per_page } => {
                    scout_info!("Fetch repositories login={} per_page={}", login, per_page);
                    let result = self
                        .api
                        .list_repositories(&login, PageParams::first(per_page))
                        .await
                        .map_err(|err| {
                            scout_warn!(
                                "Repositories for {} failed: {} ({})",
                                login,
                                err,
                                err.kind
                            );
                            err.to_string()
                        });
                    self.dispatch(Msg::RepositoriesLoaded { login, result })
                }
            };
            debug_assert!(follow_up.is_empty());
        }
    }
}
