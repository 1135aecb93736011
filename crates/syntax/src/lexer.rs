//! Go tokenizer
//!
//! Produces just enough of the Go token stream to recover declarations:
//! identifiers, literals, punctuation and automatically inserted semicolons.
//! Comments are returned separately, grouped the way `go/ast` groups them.

use crate::ast::{Comment, CommentGroup};
use crate::error::{SyntaxError, SyntaxResult};

/// Token classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Int,
    /// Interpreted (`"..."`) or raw (`` `...` ``) string literal
    String,
    Char,
    /// Single punctuation character, or `...`
    Punct,
    /// Explicit `;` or one inserted at a line break
    Semi,
}

/// A lexed token with its source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub end_line: usize,
    pub offset: usize,
    pub end_offset: usize,
}

impl Token {
    /// Check for a specific punctuation token
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// Check for a specific identifier or keyword
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// Go's semicolon insertion rule: does a line break after this token end
    /// the statement?
    fn ends_statement(&self) -> bool {
        match self.kind {
            TokenKind::Ident => {
                !is_keyword(&self.text)
                    || matches!(
                        self.text.as_str(),
                        "break" | "continue" | "fallthrough" | "return"
                    )
            }
            TokenKind::Int | TokenKind::String | TokenKind::Char => true,
            TokenKind::Punct => matches!(self.text.as_str(), ")" | "]" | "}"),
            TokenKind::Semi => false,
        }
    }
}

/// Go reserved words
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

/// Tokens plus comment groups for one source file
#[derive(Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<CommentGroup>,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    out: Lexed,
    /// A real token was emitted since the last comment
    token_since_comment: bool,
}

/// Tokenize a Go source file
pub fn tokenize(src: &str) -> SyntaxResult<Lexed> {
    let mut lexer = Lexer {
        src,
        pos: 0,
        line: 1,
        out: Lexed::default(),
        token_since_comment: true,
    };
    lexer.run()?;
    Ok(lexer.out)
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn last_ends_statement(&self) -> bool {
        self.out.tokens.last().is_some_and(Token::ends_statement)
    }

    fn insert_semi(&mut self) {
        if self.last_ends_statement() {
            self.out.tokens.push(Token {
                kind: TokenKind::Semi,
                text: "\n".to_string(),
                line: self.line,
                end_line: self.line,
                offset: self.pos,
                end_offset: self.pos,
            });
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.out.tokens.push(Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            line,
            end_line: self.line,
            offset: start,
            end_offset: self.pos,
        });
        if kind != TokenKind::Semi {
            self.token_since_comment = true;
        }
    }

    fn push_comment(&mut self, start: usize, line: usize) {
        let comment = Comment {
            text: self.src[start..self.pos].to_string(),
            line,
            end_line: self.line,
            offset: start,
            end_offset: self.pos,
        };

        // A comment joins the previous group when nothing but whitespace and
        // at most one line break separates them.
        let joins = !self.token_since_comment
            && self
                .out
                .comments
                .last()
                .is_some_and(|g| g.end_line() + 1 >= line);
        match self.out.comments.last_mut() {
            Some(group) if joins => group.comments.push(comment),
            _ => self.out.comments.push(CommentGroup {
                comments: vec![comment],
            }),
        }
        self.token_since_comment = false;
    }

    fn run(&mut self) -> SyntaxResult<()> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let line = self.line;
            match c {
                '\n' => {
                    self.insert_semi();
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    self.push_comment(start, line);
                }
                '/' if self.peek_at(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(SyntaxError::new(line, "comment not terminated")),
                        }
                    }
                    let multiline = self.line > line;
                    self.push_comment(start, line);
                    if multiline {
                        self.insert_semi();
                    }
                }
                c if c.is_alphabetic() || c == '_' => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.bump();
                    }
                    self.push(TokenKind::Ident, start, line);
                }
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) =>
                {
                    self.number();
                    self.push(TokenKind::Int, start, line);
                }
                '"' => {
                    self.quoted('"', line)?;
                    self.push(TokenKind::String, start, line);
                }
                '\'' => {
                    self.quoted('\'', line)?;
                    self.push(TokenKind::Char, start, line);
                }
                '`' => {
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('`') => break,
                            Some(_) => {}
                            None => {
                                return Err(SyntaxError::new(line, "raw string literal not terminated"));
                            }
                        }
                    }
                    self.push(TokenKind::String, start, line);
                }
                ';' => {
                    self.bump();
                    self.push(TokenKind::Semi, start, line);
                }
                '.' if self.src[self.pos..].starts_with("...") => {
                    self.pos += 3;
                    self.push(TokenKind::Punct, start, line);
                }
                _ => {
                    self.bump();
                    self.push(TokenKind::Punct, start, line);
                }
            }
        }
        self.insert_semi();
        Ok(())
    }

    fn number(&mut self) {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    fn quoted(&mut self, quote: char, line: usize) -> SyntaxResult<()> {
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => return Ok(()),
                Some('\n') | None => {
                    return Err(SyntaxError::new(line, "string literal not terminated"));
                }
                Some(_) => {}
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, String)> {
        tokenize(src)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        let toks = kinds("package main\ntype A struct {\n\tX int\n}\n");
        let semis = toks.iter().filter(|(k, _)| *k == TokenKind::Semi).count();
        // after `main`, after `int`, after `}`
        assert_eq!(semis, 3);
        assert_eq!(toks[0], (TokenKind::Ident, "package".to_string()));
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        let toks = kinds("struct {\n}");
        assert_eq!(toks[1], (TokenKind::Punct, "{".to_string()));
        assert_eq!(toks[2], (TokenKind::Punct, "}".to_string()));
    }

    #[test]
    fn test_string_literals() {
        let toks = kinds("X int `db:\"pk\"`\nY string \"json:\\\"y\\\"\"");
        assert_eq!(toks[2], (TokenKind::String, "`db:\"pk\"`".to_string()));
        assert_eq!(toks[6].0, TokenKind::String);
    }

    #[test]
    fn test_comment_groups() {
        let lexed = tokenize("// a\n// b\n\n// c\ntype X int // trailing\n").unwrap();
        assert_eq!(lexed.comments.len(), 3);
        assert_eq!(lexed.comments[0].comments.len(), 2);
        assert_eq!(lexed.comments[1].text(), "// c");
        assert_eq!(lexed.comments[2].line(), 5);
    }

    #[test]
    fn test_ellipsis_and_numbers() {
        let toks = kinds("f(a ...int, 1.5e+3, 0x1F)");
        assert!(toks.iter().any(|(k, t)| *k == TokenKind::Punct && t == "..."));
        assert!(toks.iter().any(|(k, t)| *k == TokenKind::Int && t == "1.5e+3"));
        assert!(toks.iter().any(|(k, t)| *k == TokenKind::Int && t == "0x1F"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x := \"abc\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(tokenize("/* never closed").is_err());
    }
}
