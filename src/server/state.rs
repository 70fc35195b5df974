//! Shared state handed to every handler

use crate::auth::SessionStore;
use crate::core::store::RecordStore;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, sessions: SessionStore) -> Self {
        Self { store, sessions }
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn RecordStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
