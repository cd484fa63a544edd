//! Recursive-descent parser over the lexer's token stream.

use crate::ast::{FunctionDef, ImportStmt, Module, Param, ParamKind, TypeExpr};
use crate::error::ParseError;
use crate::lexer::{Position, Token, TokenKind};

const SHAPE_ERROR: &str =
    "The tool source code must only define a single function, optionally preceded by imports.";

struct Parser<'a> {
    tokens: &'a [Token],
    i: usize,
}

/// Parses a full module: zero or more import statements followed by exactly
/// one function definition.
///
/// # Errors
/// Returns a single [`ParseError`] describing the first syntax or shape
/// problem encountered. Function-shape *validation* (missing annotations,
/// `*args`, …) happens separately in [`crate::compiler::validate`].
pub fn parse(tokens: &[Token]) -> Result<Module, ParseError> {
    let mut parser = Parser { tokens, i: 0 };
    parser.skip_blank_lines();

    let mut imports = Vec::new();
    while parser.at_import_start() {
        imports.push(parser.parse_import()?);
        parser.skip_blank_lines();
    }

    if !parser.at_keyword("def") {
        return Err(parser.error(SHAPE_ERROR));
    }
    let function = parser.parse_function_def()?;
    parser.skip_blank_lines();

    if !matches!(parser.peek().kind, TokenKind::EndMarker) {
        return Err(parser.error(SHAPE_ERROR));
    }

    Ok(Module { imports, function })
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.i.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn pos(&self) -> Position {
        self.peek().pos
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.i < self.tokens.len() - 1 {
            self.i += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { message: message.into(), pos: Some(self.pos()) }
    }

    fn skip_blank_lines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn at_keyword(&self, word: &str) -> bool {
        matches!(self.peek_kind(), TokenKind::Name(name) if name == word)
    }

    fn at_import_start(&self) -> bool {
        self.at_keyword("import") || self.at_keyword("from")
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Name(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(format!("expected an identifier, found {:?}", self.peek_kind()))),
        }
    }

    fn expect_op(&mut self, op: &str) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Op(found) if found == op => {
                self.advance();
                Ok(())
            }
            other => Err(self.error(format!("expected {op:?}, found {other:?}"))),
        }
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if matches!(self.peek_kind(), TokenKind::Op(found) if found == op) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_name()?;
        while self.eat_op(".") {
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    fn parse_import(&mut self) -> Result<ImportStmt, ParseError> {
        if self.eat_keyword("import") {
            let mut names = Vec::new();
            loop {
                let module = self.parse_dotted_name()?;
                let alias = self.parse_optional_alias()?;
                names.push((module, alias));
                if !self.eat_op(",") {
                    break;
                }
            }
            self.expect_statement_end()?;
            return Ok(ImportStmt::Import(names));
        }

        self.expect_keyword("from")?;
        let module = self.parse_dotted_name()?;
        self.expect_keyword("import")?;
        let parenthesized = self.eat_op("(");
        let mut names = Vec::new();
        loop {
            let name = self.expect_name()?;
            let alias = self.parse_optional_alias()?;
            names.push((name, alias));
            if !self.eat_op(",") {
                break;
            }
        }
        if parenthesized {
            self.expect_op(")")?;
        }
        self.expect_statement_end()?;
        Ok(ImportStmt::From { module, names })
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword("as") {
            Ok(Some(self.expect_name()?))
        } else {
            Ok(None)
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), ParseError> {
        if self.eat_keyword(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected keyword {word:?}, found {:?}", self.peek_kind())))
        }
    }

    fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::EndMarker => {
                if matches!(self.peek_kind(), TokenKind::Newline) {
                    self.advance();
                }
                Ok(())
            }
            other => Err(self.error(format!("expected end of statement, found {other:?}"))),
        }
    }

    fn parse_function_def(&mut self) -> Result<FunctionDef, ParseError> {
        self.expect_keyword("def")?;
        let name = self.expect_name()?;
        self.expect_op("(")?;
        let mut params = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::Op(op) if op == ")") {
            params.push(self.parse_param()?);
            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;

        let return_annotation =
            if self.eat_op("->") { Some(self.parse_type_expr()?) } else { None };
        self.expect_op(":")?;
        self.expect_statement_end()?;

        if !matches!(self.peek_kind(), TokenKind::Indent) {
            return Err(self.error("expected an indented function body"));
        }
        self.advance();

        let docstring = self.parse_optional_docstring();
        self.skip_function_body();

        Ok(FunctionDef { name, params, return_annotation, docstring })
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        if self.eat_op("/") {
            return Ok(Param {
                name: "/".to_owned(),
                annotation: None,
                has_default: false,
                kind: ParamKind::PositionalOnlyMarker,
            });
        }

        if self.eat_op("**") {
            let name = self.expect_name()?;
            let annotation = self.parse_optional_annotation()?;
            return Ok(Param { name, annotation, has_default: false, kind: ParamKind::KwArgs });
        }

        if self.eat_op("*") {
            if matches!(self.peek_kind(), TokenKind::Name(_)) {
                let name = self.expect_name()?;
                let annotation = self.parse_optional_annotation()?;
                return Ok(Param { name, annotation, has_default: false, kind: ParamKind::VarArgs });
            }
            return Ok(Param {
                name: "*".to_owned(),
                annotation: None,
                has_default: false,
                kind: ParamKind::KeywordOnlyMarker,
            });
        }

        let name = self.expect_name()?;
        let annotation = self.parse_optional_annotation()?;
        let has_default = self.eat_op("=");
        if has_default {
            self.skip_default_value();
        }
        Ok(Param { name, annotation, has_default, kind: ParamKind::Normal })
    }

    fn parse_optional_annotation(&mut self) -> Result<Option<TypeExpr>, ParseError> {
        if self.eat_op(":") {
            Ok(Some(self.parse_type_expr()?))
        } else {
            Ok(None)
        }
    }

    fn skip_default_value(&mut self) {
        let mut local_depth = 0i32;
        loop {
            match self.peek_kind() {
                TokenKind::Op(op) if op == "(" || op == "[" || op == "{" => {
                    local_depth += 1;
                    self.advance();
                }
                TokenKind::Op(op) if op == ")" || op == "]" || op == "}" => {
                    if local_depth == 0 {
                        break;
                    }
                    local_depth -= 1;
                    self.advance();
                }
                TokenKind::Op(op) if op == "," && local_depth == 0 => break,
                TokenKind::Newline | TokenKind::EndMarker => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Str(s) => {
                self.advance();
                Ok(TypeExpr::LiteralStr(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(TypeExpr::LiteralNum(n))
            }
            TokenKind::Name(name) if name == "True" => {
                self.advance();
                Ok(TypeExpr::LiteralBool(true))
            }
            TokenKind::Name(name) if name == "False" => {
                self.advance();
                Ok(TypeExpr::LiteralBool(false))
            }
            TokenKind::Name(name) if name == "None" => {
                self.advance();
                Ok(TypeExpr::LiteralNone)
            }
            TokenKind::Op(op) if op == "..." => {
                self.advance();
                Ok(TypeExpr::Name("...".to_owned()))
            }
            TokenKind::Name(_) => {
                let name = self.parse_dotted_name()?;
                if self.eat_op("[") {
                    let mut args = Vec::new();
                    while !matches!(self.peek_kind(), TokenKind::Op(op) if op == "]") {
                        args.push(self.parse_type_expr()?);
                        if !self.eat_op(",") {
                            break;
                        }
                    }
                    self.expect_op("]")?;
                    Ok(TypeExpr::Subscript(Box::new(TypeExpr::Name(name)), args))
                } else {
                    Ok(TypeExpr::Name(name))
                }
            }
            other => Err(self.error(format!("expected a type annotation, found {other:?}"))),
        }
    }

    fn parse_optional_docstring(&mut self) -> Option<String> {
        if let TokenKind::Str(content) = self.peek_kind().clone() {
            let save = self.i;
            self.advance();
            if matches!(self.peek_kind(), TokenKind::Newline) {
                self.advance();
                return Some(content);
            }
            self.i = save;
        }
        None
    }

    fn skip_function_body(&mut self) {
        let mut nesting = 0;
        loop {
            match self.peek_kind() {
                TokenKind::Indent => {
                    nesting += 1;
                    self.advance();
                }
                TokenKind::Dedent => {
                    if nesting == 0 {
                        self.advance();
                        break;
                    }
                    nesting -= 1;
                    self.advance();
                }
                TokenKind::EndMarker => break,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> Result<Module, ParseError> {
        let tokens = tokenize(source).expect("tokenize");
        parse(&tokens)
    }

    #[test]
    fn parses_function_with_no_imports() {
        let module = parse_source("def add(a: int, b: int) -> int:\n    return a + b\n").expect("parse");
        assert_eq!(module.function.name, "add");
        assert_eq!(module.function.params.len(), 2);
        assert!(module.imports.is_empty());
    }

    #[test]
    fn parses_import_prologue() {
        let module = parse_source(
            "import math\nfrom typing import Optional as O\ndef f(x: O[int]) -> int:\n    return x or 0\n",
        )
        .expect("parse");
        assert_eq!(module.imports.len(), 2);
    }

    #[test]
    fn parses_docstring() {
        let module = parse_source("def f(x: int) -> int:\n    \"\"\"Doubles x.\"\"\"\n    return x * 2\n")
            .expect("parse");
        assert_eq!(module.function.docstring.as_deref(), Some("Doubles x."));
    }

    #[test]
    fn rejects_two_functions() {
        let result = parse_source("def f():\n    pass\ndef g():\n    pass\n");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_function_top_level() {
        let result = parse_source("x = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn detects_positional_only_and_varargs_markers() {
        let module = parse_source("def f(a, /, *args, **kwargs):\n    pass\n").expect("parse");
        let kinds: Vec<_> = module.function.params.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&ParamKind::PositionalOnlyMarker));
        assert!(kinds.contains(&ParamKind::VarArgs));
        assert!(kinds.contains(&ParamKind::KwArgs));
    }

    #[test]
    fn parses_subscripted_annotation() {
        let module = parse_source("def f(x: list[int]) -> None:\n    pass\n").expect("parse");
        match &module.function.params[0].annotation {
            Some(TypeExpr::Subscript(base, args)) => {
                assert!(matches!(**base, TypeExpr::Name(ref n) if n == "list"));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected subscript annotation, got {other:?}"),
        }
    }
}
