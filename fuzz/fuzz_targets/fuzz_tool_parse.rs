//! Fuzz target: the custom-tool compiler's `parse`.
//!
//! The lexer, parser, and schema walker must never panic on arbitrary
//! source text — only return a `ParseErrors` value.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    let _ = forge_tool::parse(source);
});
