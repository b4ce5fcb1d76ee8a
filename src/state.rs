// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config, models::question::Question, store::RecordStore,
    utils::hash::AdminCredentials,
};

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub config: Config,
    /// Canonical question order. Sessions only ever see shuffled copies.
    pub bank: Arc<Vec<Question>>,
    /// `None` disables the dashboard login.
    pub admin: Option<Arc<AdminCredentials>>,
}

impl FromRef<AppState> for RecordStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
