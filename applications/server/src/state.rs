/// Shared application state
use setlist_core::{policy::OwnerPolicy, storage::StorageContext};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageContext>,
    pub owner_policy: OwnerPolicy,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageContext>, owner_policy: OwnerPolicy) -> Self {
        Self {
            storage,
            owner_policy,
        }
    }
}
