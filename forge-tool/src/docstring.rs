//! Parses a ReST-flavored docstring into a description plus per-parameter
//! and return-value text.

use std::collections::BTreeMap;

/// The parsed pieces of a function docstring.
#[derive(Debug, Clone, Default)]
pub struct Docstring {
    pub description: String,
    pub params: BTreeMap<String, String>,
    pub return_description: Option<String>,
}

struct Field {
    directive: String,
    name: Option<String>,
    text_lines: Vec<String>,
}

/// Parses `raw` (the verbatim docstring content) into its description and
/// `:param:`/`:return:` fields. Directives other than `param` and `return`
/// are recognized (so they correctly end the description block and don't
/// get swallowed into it) but otherwise ignored.
#[must_use]
pub fn parse(raw: &str) -> Docstring {
    let lines: Vec<&str> = raw.lines().collect();
    let mut idx = 0;
    let mut description_lines = Vec::new();
    while idx < lines.len() && !is_field_start(lines[idx]) {
        description_lines.push(lines[idx]);
        idx += 1;
    }
    let description = description_lines.join("\n").trim().to_owned();

    let mut fields = Vec::new();
    let mut current: Option<Field> = None;

    for line in &lines[idx..] {
        if is_field_start(line) {
            if let Some(field) = current.take() {
                fields.push(field);
            }
            let (directive, name, initial_text) = split_field_header(line);
            current = Some(Field { directive, name, text_lines: vec![initial_text] });
        } else if let Some(field) = current.as_mut() {
            field.text_lines.push(line.trim().to_owned());
        }
    }
    if let Some(field) = current.take() {
        fields.push(field);
    }

    let mut doc = Docstring { description, ..Docstring::default() };
    for field in fields {
        let text = field.text_lines.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");
        match field.directive.as_str() {
            "param" => {
                if let Some(name) = field.name {
                    doc.params.insert(name, text);
                }
            }
            "return" | "returns" => doc.return_description = Some(text),
            _ => {}
        }
    }
    doc
}

fn is_field_start(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(':') && trimmed[1..].contains(':')
}

/// Splits `:param name: text` (or `:return: text`) into its directive
/// keyword, optional argument name, and the text following the second colon.
fn split_field_header(line: &str) -> (String, Option<String>, String) {
    let trimmed = line.trim_start();
    let rest = &trimmed[1..];
    let Some(colon_idx) = rest.find(':') else {
        return (String::new(), None, String::new());
    };
    let header = &rest[..colon_idx];
    let text = rest[colon_idx + 1..].trim().to_owned();

    let mut parts = header.split_whitespace();
    let directive = parts.next().unwrap_or_default().to_owned();
    let name = parts.next().map(ToOwned::to_owned);
    (directive, name, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_description_from_fields() {
        let doc = parse("Adds two numbers.\n\n:param a: the first number\n:param b: the second\n:return: the sum");
        assert_eq!(doc.description, "Adds two numbers.");
        assert_eq!(doc.params.get("a"), Some(&"the first number".to_owned()));
        assert_eq!(doc.params.get("b"), Some(&"the second".to_owned()));
        assert_eq!(doc.return_description.as_deref(), Some("the sum"));
    }

    #[test]
    fn multi_line_param_text_is_joined() {
        let doc = parse(":param a: first line\n    second line\n:return: done");
        assert_eq!(doc.params.get("a"), Some(&"first line second line".to_owned()));
    }

    #[test]
    fn unknown_directive_is_ignored_but_ends_description() {
        let doc = parse("Does a thing.\n\n:raises ValueError: if bad\n:return: nothing");
        assert_eq!(doc.description, "Does a thing.");
        assert_eq!(doc.return_description.as_deref(), Some("nothing"));
    }

    #[test]
    fn docstring_with_no_fields_is_pure_description() {
        let doc = parse("Just a description.");
        assert_eq!(doc.description, "Just a description.");
        assert!(doc.params.is_empty());
        assert!(doc.return_description.is_none());
    }
}
