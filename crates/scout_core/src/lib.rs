//! Scout core: pure search-session state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{Account, Repository, SearchUsersResponse};
pub use msg::Msg;
pub use state::{
    AppState, RequestId, ResultRow, RowStatus, DEFAULT_MAX_RESULTS, REPOSITORY_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{AppViewModel, RowView};
