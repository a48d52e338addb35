use scout_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn initial_state_is_empty() {
    let view = AppState::new().view();

    assert_eq!(view.query, "");
    assert!(!view.is_searching);
    assert!(!view.has_searched);
    assert_eq!(view.search_error, None);
    assert!(view.rows.is_empty());
}
