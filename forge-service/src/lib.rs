//! Facade shared by the HTTP and binary RPC front-ends: wires the object
//! store, orchestrator adapter, sandbox pool, and execution engine into the
//! three operations every front-end calls, plus the `Settings` both share.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod facade;

pub use config::Settings;
pub use error::ServiceError;
pub use facade::Facade;
