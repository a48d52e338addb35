use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SearchUsers {
        request_id: RequestId,
        query: String,
        per_page: u32,
    },
    FetchRepositories {
        login: String,
        per_page: u32,
    },
}
