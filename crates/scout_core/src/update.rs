use crate::{AppState, Effect, Msg, ResultRow, REPOSITORY_PAGE_SIZE};

const SEARCH_FAILED: &str = "Search failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            state.set_query(text);
            Vec::new()
        }
        Msg::SearchSubmitted { query, max_results } => {
            if query.trim().is_empty() {
                return (state, Vec::new());
            }
            let request_id = state.begin_search(query.clone());
            vec![Effect::SearchUsers {
                request_id,
                query,
                per_page: max_results,
            }]
        }
        Msg::SearchCompleted { request_id, result } => {
            // Superseded or reset searches resolve into nothing.
            if !state.is_current_request(request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(response) => state.apply_search_results(response.items),
                Err(message) => {
                    state.fail_search(non_empty_or(message, || SEARCH_FAILED.to_string()))
                }
            }
            Vec::new()
        }
        Msg::LoadRepositories { login, max_items } => {
            request_repositories(&mut state, login, max_items)
        }
        Msg::RepositoriesLoaded { login, result } => {
            // The row may have been replaced by a newer search; look it up again.
            match result {
                Ok(repositories) => state.finish_row_load(&login, repositories),
                Err(message) => {
                    let message = non_empty_or(message, || {
                        format!("Failed to fetch repositories for {login}")
                    });
                    state.fail_row_load(&login, message)
                }
            };
            Vec::new()
        }
        Msg::RowToggled { login } => {
            if state.row(&login).is_some_and(ResultRow::needs_fetch) {
                request_repositories(&mut state, login, REPOSITORY_PAGE_SIZE)
            } else {
                Vec::new()
            }
        }
        Msg::ResetClicked => {
            state.reset();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn request_repositories(state: &mut AppState, login: String, per_page: u32) -> Vec<Effect> {
    if state.begin_row_load(&login) {
        vec![Effect::FetchRepositories { login, per_page }]
    } else {
        Vec::new()
    }
}

fn non_empty_or(message: String, fallback: impl FnOnce() -> String) -> String {
    if message.trim().is_empty() {
        fallback()
    } else {
        message
    }
}
