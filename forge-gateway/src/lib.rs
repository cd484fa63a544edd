//! Axum HTTP front-end for the Forge sandboxed code-execution service.
//!
//! Exposes `/v1/execute`, `/v1/parse-custom-tool`, and
//! `/v1/execute-custom-tool` as thin adapters over the `forge-service`
//! facade, plus a `/health` liveness probe reporting warm-pool depth.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod routes;

pub use error::GatewayError;
pub use routes::create_router;
