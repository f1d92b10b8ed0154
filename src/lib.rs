// Library surface for headless/integration tests and reuse.
// The presentation shell (ui, event loop) lives on the binary side in main.rs.
pub mod config;
pub mod controller;
pub mod corpus;
pub mod diff;
pub mod metrics;
pub mod runtime;
pub mod session;
