//! Service layer: orchestration on top of the domain and the registry.

pub mod game_flow;
