use std::sync::Arc;

use intake::IntakeService;

pub mod error;
pub mod middleware;
pub mod registry_listener;
pub mod response;
pub mod routes;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    service: Arc<IntakeService>,
}

impl AppState {
    pub fn new(service: Arc<IntakeService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<IntakeService> {
        &self.service
    }
}
