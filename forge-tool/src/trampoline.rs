//! Codegen for the in-sandbox driver program: re-emits the tool's imports,
//! evaluates the tool source with its own stdout suppressed, then calls the
//! defined function with arguments drawn from the caller's input and prints
//! the JSON-serialized return value on a clean stdout.
//!
//! Per the observed shape, both the user source and the input are embedded
//! as literals rather than spliced as native values: the source as a quoted
//! string literal, the input as a JSON-literal string that the driver
//! decodes with `json.loads` rather than evaluating directly.

use crate::ast::{ImportStmt, Module};

/// Builds the driver program source for `module` (parsed from `source`),
/// whose tool function will be invoked with the arguments decoded from
/// `input_json`.
#[must_use]
pub fn build(module: &Module, source: &str, input_json: &str) -> String {
    let imports: String = module.imports.iter().map(render_import).collect::<Vec<_>>().join("\n");
    let source_literal = python_string_literal(source);
    let input_literal = python_string_literal(input_json);
    let function_name = &module.function.name;

    format!(
        "import sys\n\
         import io\n\
         import json\n\
         {imports}\n\
         \n\
         _TOOL_SOURCE = {source_literal}\n\
         _TOOL_INPUT = {input_literal}\n\
         \n\
         _stdout = sys.stdout\n\
         sys.stdout = io.StringIO()\n\
         _namespace = {{}}\n\
         try:\n\
         \u{20}\u{20}\u{20}\u{20}exec(_TOOL_SOURCE, _namespace)\n\
         finally:\n\
         \u{20}\u{20}\u{20}\u{20}sys.stdout = _stdout\n\
         \n\
         _args = json.loads(_TOOL_INPUT)\n\
         _result = _namespace[{function_name:?}](**_args)\n\
         print(json.dumps(_result))\n"
    )
}

fn render_import(stmt: &ImportStmt) -> String {
    match stmt {
        ImportStmt::Import(names) => format!("import {}", render_name_list(names)),
        ImportStmt::From { module, names } => format!("from {module} import {}", render_name_list(names)),
    }
}

fn render_name_list(names: &[(String, Option<String>)]) -> String {
    names
        .iter()
        .map(|(name, alias)| alias.as_ref().map_or_else(|| name.clone(), |alias| format!("{name} as {alias}")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders `text` as a Python triple-quoted string literal, escaping
/// backslashes and any embedded `"""` sequence so the literal cannot be
/// broken out of by tool source or input content.
fn python_string_literal(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    format!("\"\"\"{escaped}\"\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionDef, Module};

    fn sample_module() -> Module {
        Module {
            imports: vec![ImportStmt::Import(vec![("math".to_owned(), None)])],
            function: FunctionDef {
                name: "add".to_owned(),
                params: Vec::new(),
                return_annotation: None,
                docstring: None,
            },
        }
    }

    #[test]
    fn embeds_imports_source_and_input() {
        let source = "import math\ndef add(a, b):\n    return a + b\n";
        let program = build(&sample_module(), source, r#"{"a": 1, "b": 2}"#);
        assert!(program.contains("import math"));
        assert!(program.contains("_namespace[\"add\"]"));
        assert!(program.contains(r#"{"a": 1, "b": 2}"#));
        assert!(program.contains("json.loads(_TOOL_INPUT)"));
    }

    #[test]
    fn escapes_triple_quotes_in_source() {
        let module = sample_module();
        let source = "x = \"\"\"nested\"\"\"\n";
        let program = build(&module, source, "{}");
        assert!(program.contains("\\\"\\\"\\\""));
    }

    #[test]
    fn suppresses_stdout_during_exec() {
        let program = build(&sample_module(), "def add(a, b):\n    return a + b\n", "{}");
        assert!(program.contains("sys.stdout = io.StringIO()"));
        assert!(program.contains("sys.stdout = _stdout"));
    }
}
