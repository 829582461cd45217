use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::{auth::AuthService, progress::ProgressService},
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub progress: Arc<ProgressService>,
    pub config: Config,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
