//! A small indentation-aware lexer covering the subset of Python syntax a
//! tool-function source can use: import statements and a single function
//! signature. Statement bodies are never tokenized in depth — only scanned
//! far enough to find the docstring and the matching dedent.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Name(String),
    Str(String),
    Number(String),
    Op(String),
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub pos: Position,
}

const MULTI_CHAR_OPS: &[&str] = &["->", "**", "...", "=="];
const SINGLE_CHAR_OPS: &str = "()[]{}:,=.*";

struct Lexer {
    chars: Vec<char>,
    i: usize,
    line: usize,
    column: usize,
    depth: i32,
    indents: Vec<usize>,
    tokens: Vec<Token>,
    at_line_start: bool,
}

/// Tokenizes `source` into a flat stream terminated by `EndMarker`.
///
/// # Errors
/// Returns [`LexError`] on an unterminated string literal, an unexpected
/// character, or indentation that does not match any enclosing level.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        i: 0,
        line: 1,
        column: 1,
        depth: 0,
        indents: vec![0],
        tokens: Vec::new(),
        at_line_start: true,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer {
    fn pos(&self) -> Position {
        Position { line: self.line, column: self.column }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.i + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn run(&mut self) -> Result<(), LexError> {
        loop {
            if self.at_line_start && self.depth == 0 {
                self.handle_indentation()?;
            }
            self.at_line_start = false;

            let Some(c) = self.peek() else { break };

            if c == '\n' {
                self.advance();
                if self.depth == 0 {
                    self.tokens.push(Token { kind: TokenKind::Newline, pos: self.pos() });
                    self.at_line_start = true;
                }
                continue;
            }
            if c == ' ' || c == '\t' {
                self.advance();
                continue;
            }
            if c == '#' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }
            if c == '(' || c == '[' || c == '{' {
                let pos = self.pos();
                self.advance();
                self.depth += 1;
                self.tokens.push(Token { kind: TokenKind::Op(c.to_string()), pos });
                continue;
            }
            if c == ')' || c == ']' || c == '}' {
                let pos = self.pos();
                self.advance();
                self.depth -= 1;
                self.tokens.push(Token { kind: TokenKind::Op(c.to_string()), pos });
                continue;
            }
            if c == '"' || c == '\'' {
                self.lex_string(c)?;
                continue;
            }
            if c.is_ascii_digit() {
                self.lex_number();
                continue;
            }
            if c.is_alphabetic() || c == '_' {
                self.lex_name();
                continue;
            }

            if self.try_lex_op() {
                continue;
            }

            return Err(LexError { message: format!("unexpected character {c:?}"), pos: self.pos() });
        }

        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token { kind: TokenKind::Dedent, pos: self.pos() });
        }
        self.tokens.push(Token { kind: TokenKind::EndMarker, pos: self.pos() });
        Ok(())
    }

    fn handle_indentation(&mut self) -> Result<(), LexError> {
        let start = self.i;
        let mut width = 0;
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                width += 1;
                self.advance();
            } else {
                break;
            }
        }
        let _ = start;

        match self.peek() {
            None | Some('\n') | Some('#') => return Ok(()),
            _ => {}
        }

        let pos = self.pos();
        let current = *self.indents.last().expect("indent stack never empty");
        if width > current {
            self.indents.push(width);
            self.tokens.push(Token { kind: TokenKind::Indent, pos });
        } else if width < current {
            while width < *self.indents.last().expect("indent stack never empty") {
                self.indents.pop();
                self.tokens.push(Token { kind: TokenKind::Dedent, pos });
            }
            if width != *self.indents.last().expect("indent stack never empty") {
                return Err(LexError { message: "inconsistent indentation".to_owned(), pos });
            }
        }
        Ok(())
    }

    fn lex_string(&mut self, quote: char) -> Result<(), LexError> {
        let pos = self.pos();
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        let quote_len = if triple { 3 } else { 1 };
        for _ in 0..quote_len {
            self.advance();
        }

        let mut content = String::new();
        loop {
            match self.peek() {
                None => return Err(LexError { message: "unterminated string literal".to_owned(), pos }),
                Some('\\') if self.peek_at(1).is_some() => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        content.push(escaped);
                    }
                }
                Some(c) if c == quote => {
                    let closes = !triple || (self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote));
                    if closes {
                        for _ in 0..quote_len {
                            self.advance();
                        }
                        break;
                    }
                    content.push(c);
                    self.advance();
                }
                Some('\n') if !triple => {
                    return Err(LexError { message: "unterminated string literal".to_owned(), pos });
                }
                Some(c) => {
                    content.push(c);
                    self.advance();
                }
            }
        }

        self.tokens.push(Token { kind: TokenKind::Str(content), pos });
        Ok(())
    }

    fn lex_number(&mut self) {
        let pos = self.pos();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.tokens.push(Token { kind: TokenKind::Number(text), pos });
    }

    fn lex_name(&mut self) {
        let pos = self.pos();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.tokens.push(Token { kind: TokenKind::Name(text), pos });
    }

    fn try_lex_op(&mut self) -> bool {
        let pos = self.pos();
        for op in MULTI_CHAR_OPS {
            let matches = op.chars().enumerate().all(|(offset, expected)| self.peek_at(offset) == Some(expected));
            if matches {
                for _ in 0..op.chars().count() {
                    self.advance();
                }
                self.tokens.push(Token { kind: TokenKind::Op((*op).to_owned()), pos });
                return true;
            }
        }
        if let Some(c) = self.peek() {
            if SINGLE_CHAR_OPS.contains(c) {
                self.advance();
                self.tokens.push(Token { kind: TokenKind::Op(c.to_string()), pos });
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).expect("tokenize").into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_simple_def_header() {
        let kinds = kinds("def add(a: int, b: int) -> int:\n    pass\n");
        assert!(kinds.contains(&TokenKind::Name("def".to_owned())));
        assert!(kinds.contains(&TokenKind::Op("->".to_owned())));
        assert!(kinds.contains(&TokenKind::Indent));
        assert!(kinds.contains(&TokenKind::Dedent));
    }

    #[test]
    fn multiline_parens_suppress_newline() {
        let tokens = tokenize("def add(\n    a: int,\n    b: int,\n) -> int:\n    pass\n").expect("tokenize");
        let newline_count = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
        // Only the header's closing `:` line and the `pass` line produce a
        // NEWLINE; the parameter lines inside parens must not.
        assert_eq!(newline_count, 2);
    }

    #[test]
    fn triple_quoted_string_spans_lines_verbatim() {
        let tokens = tokenize("\"\"\"hello\nworld\"\"\"\n").expect("tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Str("hello\nworld".to_owned()));
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let result = tokenize("\"unterminated\n");
        assert!(result.is_err());
    }

    #[test]
    fn dedent_emitted_back_to_zero_at_end_of_source() {
        let tokens = tokenize("def f():\n    pass\n").expect("tokenize");
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::EndMarker));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Dedent));
    }
}
