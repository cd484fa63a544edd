//! Fuzz target: JSON deserialization of the gateway's `/v1/execute` body.
//!
//! Verifies that arbitrary byte sequences fed to the request deserializer
//! never cause panics, UB, or unbounded resource consumption.

#![no_main]

use forge_gateway::routes::ExecuteBody;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<ExecuteBody>(data);
});
