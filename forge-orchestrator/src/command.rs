//! Command invocation builder: positional args, named flags, and stdin.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A named flag's value. Rendered as `--key=value`, or bare `--key` when
/// the value is boolean `true`. Boolean `false` omits the flag entirely.
#[derive(Debug, Clone)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Content fed to the subcommand's stdin.
#[derive(Debug, Clone)]
pub enum StdinInput {
    Bytes(Vec<u8>),
    Text(String),
    Json(Value),
}

impl StdinInput {
    /// Encodes `value` as a JSON stdin payload.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if `value` cannot be serialized.
    pub fn json(value: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(b) => b,
            Self::Text(s) => s.into_bytes(),
            Self::Json(v) => v.to_string().into_bytes(),
        }
    }
}

/// One orchestrator-CLI invocation: positional arguments, trailing
/// verbatim arguments (after `--`), named flags, and optional stdin.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub(crate) positional: Vec<String>,
    pub(crate) trailing: Vec<String>,
    pub(crate) flags: BTreeMap<String, FlagValue>,
    pub(crate) stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Starts an empty invocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument, passed through verbatim.
    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends a trailing positional argument, emitted after a literal `--`
    /// separator and never interpreted as a flag by the subcommand.
    #[must_use]
    pub fn trailing_arg(mut self, value: impl Into<String>) -> Self {
        self.trailing.push(value.into());
        self
    }

    /// Sets a named flag.
    #[must_use]
    pub fn flag(mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.flags.insert(key.into(), value.into());
        self
    }

    /// Sets the stdin payload.
    #[must_use]
    pub fn stdin(mut self, input: StdinInput) -> Self {
        self.stdin = Some(input.into_bytes());
        self
    }

    pub(crate) fn render_args(&self, default_flags: &BTreeMap<String, FlagValue>) -> Vec<String> {
        let mut args = Vec::new();

        // Per-call flags override instance defaults with the same key.
        let mut merged = default_flags.clone();
        merged.extend(self.flags.clone());

        for arg in &self.positional {
            args.push(arg.clone());
        }
        for (key, value) in &merged {
            match value {
                FlagValue::Bool(true) => args.push(format!("--{key}")),
                FlagValue::Bool(false) => {}
                FlagValue::Text(text) => args.push(format!("--{key}={text}")),
            }
        }
        if !self.trailing.is_empty() {
            args.push("--".to_owned());
            args.extend(self.trailing.iter().cloned());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_args_orders_positional_then_flags_then_trailing() {
        let inv = Invocation::new()
            .arg("get")
            .arg("pods")
            .flag("output", "json")
            .trailing_arg("--extra");
        let args = inv.render_args(&BTreeMap::new());
        assert_eq!(args, vec!["get", "pods", "--output=json", "--", "--extra"]);
    }

    #[test]
    fn render_args_bool_true_emits_bare_flag() {
        let inv = Invocation::new().flag("watch", true);
        let args = inv.render_args(&BTreeMap::new());
        assert_eq!(args, vec!["--watch"]);
    }

    #[test]
    fn render_args_bool_false_omits_flag() {
        let inv = Invocation::new().flag("watch", false);
        let args = inv.render_args(&BTreeMap::new());
        assert!(args.is_empty());
    }

    #[test]
    fn render_args_per_call_flag_overrides_default() {
        let mut defaults = BTreeMap::new();
        defaults.insert("namespace".to_owned(), FlagValue::Text("default".to_owned()));
        let inv = Invocation::new().flag("namespace", "forge");
        let args = inv.render_args(&defaults);
        assert_eq!(args, vec!["--namespace=forge"]);
    }

    #[test]
    fn render_args_merges_default_and_per_call_flags() {
        let mut defaults = BTreeMap::new();
        defaults.insert("namespace".to_owned(), FlagValue::Text("default".to_owned()));
        let inv = Invocation::new().flag("context", "prod");
        let args = inv.render_args(&defaults);
        assert_eq!(args, vec!["--context=prod", "--namespace=default"]);
    }

    #[test]
    fn stdin_json_serializes_struct() {
        #[derive(Serialize)]
        struct Body {
            source_code: String,
        }
        let input = StdinInput::json(&Body { source_code: "print(1)".to_owned() }).expect("encode");
        let bytes = input.into_bytes();
        assert_eq!(bytes, br#"{"source_code":"print(1)"}"#);
    }
}
