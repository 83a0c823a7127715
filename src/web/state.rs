use crate::{model::ModelManager, web::SessionRegistry};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(mm: ModelManager) -> Self {
        Self {
            mm,
            sessions: SessionRegistry::new(),
        }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
