//! Fuzz target: `ObjectHash::of` and `ObjectHash::parse`.
//!
//! Verifies that hashing arbitrary bytes always produces a valid 64-char
//! lowercase hex digest, and that `parse` never panics on arbitrary text
//! (well-formed or not).

#![no_main]

use forge_core::ObjectHash;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let hash = ObjectHash::of(data);
    let hex = hash.as_str();
    assert_eq!(hex.len(), 64, "ObjectHash::of must always produce 64 hex chars");
    assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

    let json = serde_json::to_string(&hash).expect("ObjectHash serialization must not fail");
    let round_tripped: ObjectHash =
        serde_json::from_str(&json).expect("ObjectHash deserialization must not fail");
    assert_eq!(hash, round_tripped);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ObjectHash::parse(text);
    }
});
