// Composition root for the read-timestamp service.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers and inbound adapters.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
