//! Fuzz target: `WorkspacePath::parse`.
//!
//! Verifies that arbitrary text never causes a panic, and that whatever
//! does validate round-trips through serialization unchanged.

#![no_main]

use forge_core::WorkspacePath;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(path) = WorkspacePath::parse(data) else {
        return;
    };
    assert!(path.as_str().starts_with("/workspace/"));
    assert!(!path.as_str().contains('\0'));
    assert!(!path.as_str().split('/').any(|segment| segment == ".."));

    let json = serde_json::to_string(&path).expect("WorkspacePath serialization must not fail");
    let round_tripped: WorkspacePath =
        serde_json::from_str(&json).expect("WorkspacePath deserialization must not fail");
    assert_eq!(path, round_tripped);
});
