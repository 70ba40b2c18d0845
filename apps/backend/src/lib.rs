#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod domain;
pub mod engine;
pub mod error;
pub mod errors;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use domain::{Card, Deck, DeckType, Game, GameSnapshot, GameStatus, GameType, Player, PlayerId};
pub use engine::{GameResults, Outcome};
pub use error::AppError;
pub use errors::domain::DomainError;
pub use middleware::cors::cors_middleware;
pub use registry::{CreateGameOptions, GameRegistry, GameSummary};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
