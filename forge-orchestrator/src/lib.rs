//! Async adapter over a container-orchestrator CLI binary.
//!
//! Every orchestrator call shells out to a subcommand (`kubectl`-shaped:
//! positional verbs, `--flag=value` options, optional stdin) rather than
//! speaking an API protocol directly. Two response shapes are supported:
//! JSON (`--output=json`, decoded into a caller-supplied type) and plain
//! text. [`client::OrchestratorAdapter::exec_raw`] exposes the live child
//! process for streaming callers such as an interactive `exec` session.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod client;
pub mod command;
pub mod error;

pub use client::OrchestratorAdapter;
pub use command::{FlagValue, Invocation, StdinInput};
pub use error::OrchestratorError;
