use std::sync::Arc;

use crate::{auth::token::TokenService, config::Config, mailer::Mailer, news::NewsClient, store::Store};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub mailer: Arc<dyn Mailer>,
    pub news: NewsClient,
    pub config: Arc<Config>,
}
