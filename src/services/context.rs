use std::sync::Arc;

use crate::{db::store::TodoStore, services::todo_service::TodoService, state::AppState};

#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn TodoStore>,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.store))
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(Arc::clone(&self.store))
    }
}
