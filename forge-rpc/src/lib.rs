//! Binary RPC front-end (tonic/prost) for the Forge sandboxed
//! code-execution service, implementing `CodeInterpreterService` as a thin
//! adapter over the `forge-service` facade.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod service;

/// Generated protobuf types and server trait for `CodeInterpreterService`.
pub mod proto {
    tonic::include_proto!("forge.rpc.v1");
}

pub use service::CodeInterpreterServiceImpl;
