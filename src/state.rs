use std::sync::Arc;

use crate::{auth::JwtVerifier, config::AuthConfig, db::store::TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtVerifier,
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(auth: &AuthConfig, store: Arc<dyn TodoStore>) -> Arc<Self> {
        Arc::new(Self {
            jwt: JwtVerifier::from_config(auth),
            store,
        })
    }
}
