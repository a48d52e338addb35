use std::sync::Once;

use pretty_assertions::assert_eq;
use scout_core::{
    update, Account, AppState, Effect, Msg, Repository, RowStatus, SearchUsersResponse,
    REPOSITORY_PAGE_SIZE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn account(login: &str) -> Account {
    Account {
        id: 1,
        login: login.to_string(),
        avatar_url: String::new(),
        html_url: format!("https://github.com/{login}"),
        score: 1.0,
        account_type: "User".to_string(),
        site_admin: false,
    }
}

fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        id: 7,
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        html_url: format!("https://github.com/{owner}/{name}"),
        description: Some("A test repository".to_string()),
        stargazers_count: 10,
        language: Some("Rust".to_string()),
        updated_at: "2023-01-01T00:00:00Z".to_string(),
        private: false,
        fork: false,
    }
}

/// Runs a search for `logins` through to completion.
fn state_with_rows(logins: &[&str]) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::SearchSubmitted {
            query: "q".to_string(),
            max_results: 5,
        },
    );
    let (mut state, _) = update(
        state,
        Msg::SearchCompleted {
            request_id: 1,
            result: Ok(SearchUsersResponse {
                total_count: logins.len() as u64,
                incomplete_results: false,
                items: logins.iter().map(|login| account(login)).collect(),
            }),
        },
    );
    state.consume_dirty();
    state
}

fn load(state: AppState, login: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::LoadRepositories {
            login: login.to_string(),
            max_items: 100,
        },
    )
}

fn loaded(state: AppState, login: &str, result: Result<Vec<Repository>, String>) -> AppState {
    update(
        state,
        Msg::RepositoriesLoaded {
            login: login.to_string(),
            result,
        },
    )
    .0
}

#[test]
fn load_marks_only_target_row_loading() {
    init_logging();
    let state = state_with_rows(&["alice", "bob"]);
    let bob_before = state.row("bob").cloned();

    let (state, effects) = load(state, "alice");

    assert_eq!(
        effects,
        vec![Effect::FetchRepositories {
            login: "alice".to_string(),
            per_page: 100,
        }]
    );
    assert!(state.row("alice").is_some_and(|row| row.is_loading()));
    assert_eq!(state.row("bob").cloned(), bob_before);
}

#[test]
fn successful_load_patches_only_target_row() {
    init_logging();
    let state = state_with_rows(&["alice", "bob"]);
    let bob_before = state.row("bob").cloned();
    let repos = vec![repository("alice", "one"), repository("alice", "two")];

    let (state, _) = load(state, "alice");
    let state = loaded(state, "alice", Ok(repos.clone()));

    let alice = state.row("alice").expect("alice row");
    assert_eq!(alice.repositories(), repos.as_slice());
    assert!(!alice.is_loading());
    assert_eq!(alice.error(), None);
    assert_eq!(alice.status(), &RowStatus::Loaded);
    assert_eq!(state.row("bob").cloned(), bob_before);
}

#[test]
fn failed_load_clears_repositories_and_sets_row_error() {
    init_logging();
    let state = state_with_rows(&["alice"]);
    let (state, _) = load(state, "alice");
    let state = loaded(state, "alice", Ok(vec![repository("alice", "one")]));

    let (state, _) = load(state, "alice");
    assert_eq!(state.row("alice").map(|row| row.error()), Some(None));
    let state = loaded(state, "alice", Err("Not Found".to_string()));

    let alice = state.row("alice").expect("alice row");
    assert!(alice.repositories().is_empty());
    assert!(!alice.is_loading());
    assert_eq!(alice.error(), Some("Not Found"));
    assert!(state.search_error().is_none());
}

#[test]
fn blank_load_failure_mentions_login() {
    init_logging();
    let state = state_with_rows(&["alice"]);
    let (state, _) = load(state, "alice");
    let state = loaded(state, "alice", Err(String::new()));

    assert_eq!(
        state.row("alice").and_then(|row| row.error()),
        Some("Failed to fetch repositories for alice")
    );
}

#[test]
fn load_for_missing_login_is_noop() {
    init_logging();
    let state = state_with_rows(&["alice"]);

    let (mut next, effects) = load(state.clone(), "missing");

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next, state);
}

#[test]
fn late_load_for_replaced_row_is_ignored() {
    init_logging();
    let state = state_with_rows(&["alice"]);
    let (state, _) = load(state, "alice");

    // A newer search replaces the result set before the fetch resolves.
    let (state, _) = update(
        state,
        Msg::SearchSubmitted {
            query: "other".to_string(),
            max_results: 5,
        },
    );
    let (mut state, _) = update(
        state,
        Msg::SearchCompleted {
            request_id: 2,
            result: Ok(SearchUsersResponse {
                total_count: 1,
                incomplete_results: false,
                items: vec![account("carol")],
            }),
        },
    );
    state.consume_dirty();
    let before = state.clone();

    let mut state = loaded(state, "alice", Ok(vec![repository("alice", "one")]));

    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn toggle_requests_fetch_for_idle_row() {
    init_logging();
    let state = state_with_rows(&["alice"]);

    let (state, effects) = update(
        state,
        Msg::RowToggled {
            login: "alice".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::FetchRepositories {
            login: "alice".to_string(),
            per_page: REPOSITORY_PAGE_SIZE,
        }]
    );
    assert!(state.row("alice").is_some_and(|row| row.is_loading()));
}

#[test]
fn toggle_is_noop_while_loading_or_loaded() {
    init_logging();
    let state = state_with_rows(&["alice", "empty"]);
    let (state, _) = load(state, "alice");
    let toggle = |state: AppState, login: &str| {
        update(
            state,
            Msg::RowToggled {
                login: login.to_string(),
            },
        )
    };

    let (state, effects) = toggle(state, "alice");
    assert!(effects.is_empty(), "already loading");

    let state = loaded(state, "alice", Ok(vec![repository("alice", "one")]));
    let (state, effects) = toggle(state, "alice");
    assert!(effects.is_empty(), "already loaded");

    // An account that genuinely has no repositories is not refetched either.
    let (state, _) = load(state, "empty");
    let state = loaded(state, "empty", Ok(Vec::new()));
    let (_state, effects) = toggle(state, "empty");
    assert!(effects.is_empty(), "loaded with zero repositories");
}

#[test]
fn toggle_retries_failed_row() {
    init_logging();
    let state = state_with_rows(&["alice"]);
    let (state, _) = load(state, "alice");
    let state = loaded(state, "alice", Err("timeout".to_string()));

    let (state, effects) = update(
        state,
        Msg::RowToggled {
            login: "alice".to_string(),
        },
    );

    assert_eq!(effects.len(), 1);
    let alice = state.row("alice").expect("alice row");
    assert!(alice.is_loading());
    assert_eq!(alice.error(), None);
}

#[test]
fn toggle_unknown_login_is_noop() {
    init_logging();
    let state = state_with_rows(&["alice"]);
    let (next, effects) = update(
        state.clone(),
        Msg::RowToggled {
            login: "nobody".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn reset_clears_rows_regardless_of_row_state() {
    init_logging();
    let state = state_with_rows(&["alice", "bob"]);
    let (state, _) = load(state, "alice");
    let state = loaded(state, "alice", Ok(vec![repository("alice", "one")]));
    let (state, _) = load(state, "bob");

    let (mut state, effects) = update(state, Msg::ResetClicked);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.view(), AppState::new().view());
}
