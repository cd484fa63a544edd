//! Maps a parsed type annotation to a JSON Schema (draft-07) fragment.

use serde_json::{json, Value};

use crate::alias::AliasMap;
use crate::ast::TypeExpr;

/// An annotation the walker does not recognize.
#[derive(Debug, Clone)]
pub struct SchemaError(pub String);

/// Converts `expr` to a JSON Schema fragment, resolving any `typing`
/// aliases via `aliases` first.
///
/// # Errors
/// Returns [`SchemaError`] naming the offending annotation for any
/// construct outside the supported set.
pub fn type_to_schema(expr: &TypeExpr, aliases: &AliasMap) -> Result<Value, SchemaError> {
    match expr {
        TypeExpr::LiteralStr(s) => Ok(Value::String(s.clone())),
        TypeExpr::LiteralNum(n) => Ok(number_value(n)),
        TypeExpr::LiteralBool(b) => Ok(Value::Bool(*b)),
        TypeExpr::LiteralNone => Ok(Value::Null),
        TypeExpr::Name(name) => scalar_schema(&aliases.resolve(name)),
        TypeExpr::Subscript(base, args) => {
            let TypeExpr::Name(base_name) = base.as_ref() else {
                return Err(SchemaError(format!("{base:?}")));
            };
            subscript_schema(&aliases.resolve(base_name), args, aliases)
        }
    }
}

fn number_value(text: &str) -> Value {
    if text.contains('.') {
        text.parse::<f64>().ok().and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number)
    } else {
        text.parse::<i64>().map_or_else(|_| Value::String(text.to_owned()), |n| json!(n))
    }
}

fn scalar_schema(canonical: &str) -> Result<Value, SchemaError> {
    match canonical {
        "int" => Ok(json!({"type": "integer"})),
        "float" => Ok(json!({"type": "number"})),
        "str" => Ok(json!({"type": "string"})),
        "bool" => Ok(json!({"type": "boolean"})),
        "Any" => Ok(json!({"type": "array"})),
        "None" | "NoneType" => Ok(json!({"type": "null"})),
        "list" => Ok(json!({"type": "array"})),
        "dict" => Ok(json!({"type": "object"})),
        "tuple" | "Tuple" => Ok(json!({"type": "array"})),
        other => Err(SchemaError(other.to_owned())),
    }
}

fn subscript_schema(canonical: &str, args: &[TypeExpr], aliases: &AliasMap) -> Result<Value, SchemaError> {
    match canonical {
        "list" => {
            let item = args.first().ok_or_else(|| SchemaError("list[]".to_owned()))?;
            Ok(json!({"type": "array", "items": type_to_schema(item, aliases)?}))
        }
        "dict" => {
            let [key, value] = args else {
                return Err(SchemaError("dict[..]".to_owned()));
            };
            let TypeExpr::Name(key_name) = key else {
                return Err(SchemaError("dict key must be str".to_owned()));
            };
            if aliases.resolve(key_name) != "str" {
                return Err(SchemaError("dict key must be str".to_owned()));
            }
            Ok(json!({"type": "object", "additionalProperties": type_to_schema(value, aliases)?}))
        }
        "Tuple" | "tuple" => {
            let items: Result<Vec<Value>, SchemaError> =
                args.iter().map(|a| type_to_schema(a, aliases)).collect();
            let items = items?;
            Ok(json!({
                "type": "array",
                "minItems": items.len(),
                "items": items,
                "additionalItems": false,
            }))
        }
        "Optional" => {
            let inner = args.first().ok_or_else(|| SchemaError("Optional[]".to_owned()))?;
            Ok(json!({"anyOf": [{"type": "null"}, type_to_schema(inner, aliases)?]}))
        }
        "Union" => {
            let variants: Result<Vec<Value>, SchemaError> =
                args.iter().map(|a| type_to_schema(a, aliases)).collect();
            Ok(json!({"anyOf": variants?}))
        }
        "Literal" => {
            let values: Result<Vec<Value>, SchemaError> =
                args.iter().map(|a| type_to_schema(a, aliases)).collect();
            Ok(json!({"enum": values?}))
        }
        "Annotated" => {
            let inner = args.first().ok_or_else(|| SchemaError("Annotated[]".to_owned()))?;
            type_to_schema(inner, aliases)
        }
        "Final" => {
            let inner = args.first().ok_or_else(|| SchemaError("Final[]".to_owned()))?;
            type_to_schema(inner, aliases)
        }
        other => Err(SchemaError(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeExpr as T;

    fn name(s: &str) -> TypeExpr {
        T::Name(s.to_owned())
    }

    #[test]
    fn scalar_types_map_directly() {
        let aliases = AliasMap::default();
        assert_eq!(type_to_schema(&name("int"), &aliases).unwrap(), json!({"type": "integer"}));
        assert_eq!(type_to_schema(&name("str"), &aliases).unwrap(), json!({"type": "string"}));
    }

    #[test]
    fn any_maps_to_array_per_observed_behavior() {
        let aliases = AliasMap::default();
        assert_eq!(type_to_schema(&name("Any"), &aliases).unwrap(), json!({"type": "array"}));
    }

    #[test]
    fn list_of_int_has_items() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(Box::new(name("list")), vec![name("int")]);
        assert_eq!(
            type_to_schema(&expr, &aliases).unwrap(),
            json!({"type": "array", "items": {"type": "integer"}})
        );
    }

    #[test]
    fn dict_with_non_string_key_is_error() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(Box::new(name("dict")), vec![name("int"), name("str")]);
        assert!(type_to_schema(&expr, &aliases).is_err());
    }

    #[test]
    fn optional_wraps_null_and_inner() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(Box::new(name("Optional")), vec![name("int")]);
        assert_eq!(
            type_to_schema(&expr, &aliases).unwrap(),
            json!({"anyOf": [{"type": "null"}, {"type": "integer"}]})
        );
    }

    #[test]
    fn tuple_sets_min_items_and_additional_items_false() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(Box::new(name("Tuple")), vec![name("int"), name("str")]);
        let schema = type_to_schema(&expr, &aliases).unwrap();
        assert_eq!(schema["minItems"], json!(2));
        assert_eq!(schema["additionalItems"], json!(false));
    }

    #[test]
    fn literal_becomes_enum_of_raw_values() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(
            Box::new(name("Literal")),
            vec![T::LiteralStr("a".to_owned()), T::LiteralStr("b".to_owned())],
        );
        assert_eq!(type_to_schema(&expr, &aliases).unwrap(), json!({"enum": ["a", "b"]}));
    }

    #[test]
    fn annotated_unwraps_to_inner_type() {
        let aliases = AliasMap::default();
        let expr = T::Subscript(
            Box::new(name("Annotated")),
            vec![name("int"), T::LiteralStr("metadata".to_owned())],
        );
        assert_eq!(type_to_schema(&expr, &aliases).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn unknown_annotation_is_error() {
        let aliases = AliasMap::default();
        assert!(type_to_schema(&name("Frobnicator"), &aliases).is_err());
    }

    #[test]
    fn alias_is_resolved_before_matching() {
        let mut imports_source = String::new();
        imports_source.push_str("from typing import Optional as O\n");
        let _ = imports_source;
        // AliasMap is exercised end to end in alias::tests; here we only
        // check that an already-resolved name still matches.
        let aliases = AliasMap::default();
        let expr = T::Subscript(Box::new(name("Optional")), vec![name("int")]);
        assert!(type_to_schema(&expr, &aliases).is_ok());
    }
}
