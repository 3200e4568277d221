use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::corpus::CorpusSource;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub corpus: Arc<dyn CorpusSource>,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CorpusSource> {
    fn from_ref(state: &AppState) -> Self {
        state.corpus.clone()
    }
}
