use crate::services::IndexHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub index: IndexHandle,
}

impl AppState {
    pub fn new(index: IndexHandle) -> Self {
        Self { index }
    }
}
