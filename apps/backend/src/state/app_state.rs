use std::sync::Arc;

use crate::registry::GameRegistry;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game registry; the single shared mutable resource.
    registry: Arc<GameRegistry>,
}

impl AppState {
    /// Create a new AppState with a fresh registry
    pub fn new() -> Self {
        Self {
            registry: Arc::new(GameRegistry::new()),
        }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Clone the shared registry handle, e.g. for the sweep task.
    pub fn registry_handle(&self) -> Arc<GameRegistry> {
        Arc::clone(&self.registry)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
