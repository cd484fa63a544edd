//! Top-level `parse(source) -> ToolDescriptor` pipeline: lex, parse,
//! validate the function shape, and compile its signature into a JSON
//! Schema document.

use std::collections::BTreeMap;

use forge_core::tool::ToolDescriptor;
use serde_json::{json, Map, Value};

use crate::alias::AliasMap;
use crate::ast::{Module, ParamKind, TypeExpr};
use crate::docstring;
use crate::error::{ParseError, ParseErrors};
use crate::lexer::tokenize;
use crate::parser::parse as parse_module;
use crate::schema::type_to_schema;

/// Parses and compiles `source` into a [`ToolDescriptor`].
///
/// # Errors
/// Returns [`ParseErrors`] on a syntax error, a shape violation (stray
/// top-level statements, `*args`/`**kwargs`, missing annotations, …), or an
/// unrecognized annotation construct. All shape violations for a
/// syntactically valid function are accumulated and returned together.
pub fn parse(source: &str) -> Result<ToolDescriptor, ParseErrors> {
    let tokens = tokenize(source).map_err(|err| {
        ParseErrors(vec![ParseError { message: err.message, pos: Some(err.pos) }])
    })?;
    let module = parse_module(&tokens).map_err(|err| ParseErrors(vec![err]))?;

    let violations = validate_shape(&module);
    if !violations.is_empty() {
        return Err(ParseErrors(violations));
    }

    compile(&module).map_err(ParseErrors)
}

fn validate_shape(module: &Module) -> Vec<ParseError> {
    let mut errors = Vec::new();
    for param in &module.function.params {
        match param.kind {
            ParamKind::PositionalOnlyMarker => errors.push(ParseError {
                message: "The tool function must not have positional-only arguments".to_owned(),
                pos: None,
            }),
            ParamKind::VarArgs => errors.push(ParseError {
                message: "The tool function must not have *args".to_owned(),
                pos: None,
            }),
            ParamKind::KwArgs => errors.push(ParseError {
                message: "The tool function must not have **kwargs".to_owned(),
                pos: None,
            }),
            ParamKind::KeywordOnlyMarker => {}
            ParamKind::Normal => {
                if param.annotation.is_none() {
                    errors.push(ParseError {
                        message: "The tool function arguments must have type annotations".to_owned(),
                        pos: None,
                    });
                }
            }
        }
    }
    errors
}

fn compile(module: &Module) -> Result<ToolDescriptor, Vec<ParseError>> {
    let aliases = AliasMap::from_imports(&module.imports);
    let doc = module.function.docstring.as_deref().map(docstring::parse).unwrap_or_default();

    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut schema_errors = Vec::new();

    for param in &module.function.params {
        if !matches!(param.kind, ParamKind::Normal) {
            continue;
        }
        let Some(annotation) = &param.annotation else { continue };
        match type_to_schema(annotation, &aliases) {
            Ok(mut fragment) => {
                if let Some(desc) = doc.params.get(&param.name) {
                    if let Value::Object(obj) = &mut fragment {
                        obj.insert("description".to_owned(), Value::String(desc.clone()));
                    }
                }
                properties.insert(param.name.clone(), fragment);
                if !param.has_default {
                    required.push(param.name.clone());
                }
            }
            Err(err) => schema_errors.push(ParseError {
                message: format!("unsupported type annotation `{}`", err.0),
                pos: None,
            }),
        }
    }

    if !schema_errors.is_empty() {
        return Err(schema_errors);
    }

    let input_schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "title": module.function.name,
        "properties": Value::Object(properties),
        "required": required,
        "additionalProperties": false,
    });

    Ok(ToolDescriptor {
        name: module.function.name.clone(),
        description: build_description(module, &doc),
        input_schema,
    })
}

fn build_description(module: &Module, doc: &docstring::Docstring) -> String {
    let mut description = doc.description.clone();

    let return_type = module.function.return_annotation.as_ref().map(render_type).unwrap_or_default();
    let return_desc = doc.return_description.clone().unwrap_or_default();
    if !return_type.is_empty() || !return_desc.is_empty() {
        description.push_str("\n\nReturns: ");
        description.push_str(&return_type);
        description.push_str(" -- ");
        description.push_str(&return_desc);
    }
    description
}

fn render_type(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Name(name) => name.clone(),
        TypeExpr::Subscript(base, args) => {
            let rendered_args: Vec<String> = args.iter().map(render_type).collect();
            format!("{}[{}]", render_type(base), rendered_args.join(", "))
        }
        TypeExpr::LiteralStr(s) => format!("{s:?}"),
        TypeExpr::LiteralNum(n) => n.clone(),
        TypeExpr::LiteralBool(true) => "True".to_owned(),
        TypeExpr::LiteralBool(false) => "False".to_owned(),
        TypeExpr::LiteralNone => "None".to_owned(),
    }
}

/// Parameter name -> whether the compiled schema marked it required, for
/// callers assembling a call from partial input (unused internally, kept
/// for `forge-service` call-site convenience).
#[must_use]
pub fn required_params(descriptor: &ToolDescriptor) -> BTreeMap<String, bool> {
    let required: Vec<String> = descriptor
        .input_schema
        .get("required")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(|v| v.as_str().map(ToOwned::to_owned)).collect())
        .unwrap_or_default();
    descriptor
        .input_schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().map(|name| (name.clone(), required.contains(name))).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_simple_function_to_schema() {
        let descriptor = parse(
            "def add(a: int, b: int) -> int:\n    \"\"\":param a: first\n    :param b: second\n    :return: sum\n    \"\"\"\n    return a + b\n",
        )
        .expect("compile");
        assert_eq!(descriptor.name, "add");
        assert_eq!(descriptor.input_schema["properties"]["a"]["type"], json!("integer"));
        assert_eq!(descriptor.input_schema["required"], json!(["a", "b"]));
        assert!(descriptor.description.contains("Returns: int -- sum"));
    }

    #[test]
    fn missing_annotation_is_reported() {
        let errors = parse("def f(a):\n    pass\n").expect_err("must fail");
        assert!(errors.messages().iter().any(|m| m.contains("type annotations")));
    }

    #[test]
    fn varargs_and_kwargs_both_reported_together() {
        let errors = parse("def f(*args, **kwargs):\n    pass\n").expect_err("must fail");
        let messages = errors.messages();
        assert!(messages.iter().any(|m| m.contains("*args")));
        assert!(messages.iter().any(|m| m.contains("**kwargs")));
    }

    #[test]
    fn optional_default_excludes_param_from_required() {
        let descriptor = parse("def f(a: int, b: int = 0):\n    pass\n").expect("compile");
        assert_eq!(descriptor.input_schema["required"], json!(["a"]));
    }

    #[test]
    fn unknown_annotation_is_reported() {
        let errors = parse("def f(a: Frobnicator):\n    pass\n").expect_err("must fail");
        assert!(errors.messages().iter().any(|m| m.contains("Frobnicator")));
    }
}
