//! Declaration parser
//!
//! Recovers type declarations (with struct fields, type expressions, tags and
//! attached comments) from a Go token stream. Everything else at the top level
//! is skipped by bracket balancing, so function bodies never need to parse.

use crate::ast::{CommentGroup, FieldDecl, SourceFile, TypeDecl, TypeExpr};
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{Token, TokenKind, tokenize};

/// Parse a Go source file into its type declarations
pub fn parse_file(src: &str) -> SyntaxResult<SourceFile> {
    let lexed = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens: lexed.tokens,
        comments: lexed.comments,
        pos: 0,
        last_end: (0, 0),
    };
    parser.file()
}

/// Byte offset and line where an already-consumed construct ends
type End = (usize, usize);

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    comments: Vec<CommentGroup>,
    pos: usize,
    /// End of the last consumed non-semicolon token
    last_end: End,
}

impl<'a> Parser<'a> {
    // ====================================================================
    // Token access
    // ====================================================================

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn peek_is_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn next(&mut self) -> SyntaxResult<Token> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| SyntaxError::new(self.line(), "unexpected end of file"))?;
        self.pos += 1;
        if tok.kind != TokenKind::Semi {
            self.last_end = (tok.end_offset, tok.end_line);
        }
        Ok(tok)
    }

    fn expect_punct(&mut self, p: &str) -> SyntaxResult<Token> {
        let tok = self.next()?;
        if tok.is_punct(p) {
            Ok(tok)
        } else {
            Err(SyntaxError::new(
                tok.line,
                format!("expected '{}', found '{}'", p, tok.text),
            ))
        }
    }

    fn expect_ident(&mut self) -> SyntaxResult<String> {
        let tok = self.next()?;
        if tok.kind == TokenKind::Ident {
            Ok(tok.text)
        } else {
            Err(SyntaxError::new(
                tok.line,
                format!("expected identifier, found '{}'", tok.text),
            ))
        }
    }

    fn skip_semis(&mut self) {
        while self.peek().is_some_and(|t| t.kind == TokenKind::Semi) {
            self.pos += 1;
        }
    }

    /// A declaration or field ends at a semicolon, a closing brace or EOF
    fn end_of_item(&mut self) -> SyntaxResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(t) if t.kind == TokenKind::Semi => {
                self.pos += 1;
                Ok(())
            }
            Some(t) if t.is_punct("}") || t.is_punct(")") => Ok(()),
            Some(t) => Err(SyntaxError::new(
                t.line,
                format!("unexpected '{}'", t.text),
            )),
        }
    }

    // ====================================================================
    // Top level
    // ====================================================================

    fn file(&mut self) -> SyntaxResult<SourceFile> {
        self.skip_semis();
        let tok = self.next()?;
        if !tok.is_ident("package") {
            return Err(SyntaxError::new(tok.line, "expected 'package' clause"));
        }
        let package = self.expect_ident()?;
        self.end_of_item()?;

        let mut file = SourceFile {
            package,
            types: Vec::new(),
        };

        loop {
            self.skip_semis();
            let Some(tok) = self.peek().cloned() else {
                break;
            };
            let prev_end = self.last_end;
            match tok.text.as_str() {
                "type" if tok.kind == TokenKind::Ident => {
                    let decls = self.type_decl(prev_end)?;
                    file.types.extend(decls);
                }
                "import" | "var" | "const" | "func" if tok.kind == TokenKind::Ident => {
                    self.skip_decl();
                }
                _ => {
                    return Err(SyntaxError::new(
                        tok.line,
                        format!("unexpected '{}' at top level", tok.text),
                    ));
                }
            }
        }

        Ok(file)
    }

    /// Skip a non-type declaration up to its terminating semicolon
    fn skip_decl(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Semi if depth == 0 => break,
                TokenKind::Punct if matches!(tok.text.as_str(), "(" | "[" | "{") => depth += 1,
                TokenKind::Punct if matches!(tok.text.as_str(), ")" | "]" | "}") => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            let _ = self.next();
        }
    }

    /// Comment groups attached to a construct spanning `start..end` whose
    /// predecessor ended at `prev`: leading groups after the predecessor's
    /// line, and trailing groups after the construct.
    ///
    /// A group that starts on the line right after a construct and is
    /// followed by a blank line trails that construct instead of leading the
    /// next one (go/ast `CommentMap`).
    fn attached(&self, prev: End, start: End, end: End) -> Vec<CommentGroup> {
        self.comments
            .iter()
            .filter(|g| {
                let leading = g.offset() >= prev.0
                    && g.line() > prev.1
                    && g.end_offset() <= start.0
                    && !(g.line() == prev.1 + 1 && self.followed_by_blank_line(g));
                let trailing = g.offset() >= end.0
                    && (g.line() == end.1
                        || (g.line() == end.1 + 1 && self.followed_by_blank_line(g)));
                leading || trailing
            })
            .cloned()
            .collect()
    }

    /// Whether at least one empty line separates `group` from the next token
    fn followed_by_blank_line(&self, group: &CommentGroup) -> bool {
        let next_line = self
            .tokens
            .iter()
            .find(|t| t.kind != TokenKind::Semi && t.offset >= group.end_offset())
            .map(|t| t.line);
        let next_comment = self
            .comments
            .iter()
            .find(|c| c.offset() >= group.end_offset())
            .map(|c| c.line());
        let next = match (next_line, next_comment) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => a.or(b).unwrap_or(usize::MAX),
        };
        next > group.end_line() + 1
    }

    fn type_decl(&mut self, prev_end: End) -> SyntaxResult<Vec<TypeDecl>> {
        let keyword = self.next()?;

        if !self.peek_is_punct("(") {
            let (name, ty) = self.type_spec()?;
            let end = self.last_end;
            self.end_of_item()?;
            return Ok(vec![TypeDecl {
                name,
                ty,
                comments: self.attached(prev_end, (keyword.offset, keyword.line), end),
                line: keyword.line,
            }]);
        }

        // type ( A ...; B ... )
        self.next()?;
        let mut specs = Vec::new();
        loop {
            self.skip_semis();
            if self.peek_is_punct(")") {
                self.next()?;
                break;
            }
            let spec_prev = self.last_end;
            let start = self
                .peek()
                .map(|t| (t.offset, t.line))
                .ok_or_else(|| SyntaxError::new(self.line(), "unterminated type group"))?;
            let (name, ty) = self.type_spec()?;
            let spec_end = self.last_end;
            self.end_of_item()?;
            specs.push((name, ty, spec_prev, start, spec_end));
        }
        let group_end = self.last_end;
        self.end_of_item()?;

        let group_comments = self.attached(prev_end, (keyword.offset, keyword.line), group_end);
        Ok(specs
            .into_iter()
            .map(|(name, ty, spec_prev, start, spec_end)| {
                let mut comments = group_comments.clone();
                comments.extend(self.attached(spec_prev, start, spec_end));
                TypeDecl {
                    name,
                    ty,
                    comments,
                    line: start.1,
                }
            })
            .collect())
    }

    fn type_spec(&mut self) -> SyntaxResult<(String, TypeExpr)> {
        let name = self.expect_ident()?;
        if self.peek_is_punct("[") && self.at_type_params() {
            self.skip_balanced()?;
        }
        if self.peek_is_punct("=") {
            self.next()?;
        }
        let ty = self.type_expr()?;
        Ok((name, ty))
    }

    /// `type List[T any] ...` as opposed to `type Buf [N]byte`
    fn at_type_params(&self) -> bool {
        let first_is_ident = self
            .peek_n(1)
            .is_some_and(|t| t.kind == TokenKind::Ident);
        let second_continues = self.peek_n(2).is_some_and(|t| {
            t.kind == TokenKind::Ident
                || t.is_punct("~")
                || t.is_punct("*")
                || t.is_punct(",")
                || t.is_punct("[")
        });
        first_is_ident && second_continues
    }

    /// Consume a bracketed run starting at the current opening bracket,
    /// returning the source text of its contents
    fn skip_balanced(&mut self) -> SyntaxResult<String> {
        let open = self.next()?;
        let mut depth = 1usize;
        let inner_start = open.end_offset;
        loop {
            let tok = self.next()?;
            if tok.kind != TokenKind::Punct {
                continue;
            }
            match tok.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.src[inner_start..tok.offset].trim().to_string());
                    }
                }
                _ => {}
            }
        }
    }

    // ====================================================================
    // Type expressions
    // ====================================================================

    fn type_expr(&mut self) -> SyntaxResult<TypeExpr> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Ident => match tok.text.as_str() {
                "struct" => Ok(TypeExpr::Struct(self.struct_body()?)),
                "map" => {
                    self.expect_punct("[")?;
                    let key = self.type_expr()?;
                    self.expect_punct("]")?;
                    let value = self.type_expr()?;
                    Ok(TypeExpr::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    })
                }
                "chan" | "func" | "interface" => Ok(TypeExpr::Other(self.rest_of_type(&tok))),
                _ => {
                    let named = if self.peek_is_punct(".")
                        && self.peek_n(1).is_some_and(|t| t.kind == TokenKind::Ident)
                    {
                        self.next()?;
                        let name = self.expect_ident()?;
                        TypeExpr::qualified(tok.text, name)
                    } else {
                        TypeExpr::Ident(tok.text)
                    };
                    if self.peek_is_punct("[") {
                        // generic instantiation
                        let args = self.skip_balanced()?;
                        return Ok(TypeExpr::Other(format!("{}[{}]", named, args)));
                    }
                    Ok(named)
                }
            },
            TokenKind::Punct => match tok.text.as_str() {
                "*" => Ok(TypeExpr::Pointer(Box::new(self.type_expr()?))),
                "[" => {
                    let len = if self.peek_is_punct("]") {
                        self.next()?;
                        None
                    } else {
                        self.pos -= 1;
                        Some(self.skip_balanced()?)
                    };
                    Ok(TypeExpr::Array {
                        len,
                        elem: Box::new(self.type_expr()?),
                    })
                }
                "(" => {
                    let inner = self.type_expr()?;
                    self.expect_punct(")")?;
                    Ok(inner)
                }
                "<" => Ok(TypeExpr::Other(self.rest_of_type(&tok))),
                _ => Err(SyntaxError::new(
                    tok.line,
                    format!("expected type, found '{}'", tok.text),
                )),
            },
            _ => Err(SyntaxError::new(
                tok.line,
                format!("expected type, found '{}'", tok.text),
            )),
        }
    }

    /// Consume the remainder of a type we do not model, up to the end of
    /// the enclosing field, returning its source text
    fn rest_of_type(&mut self, first: &Token) -> String {
        let mut depth = 0usize;
        let mut end = first.end_offset;
        while let Some(tok) = self.peek() {
            let at_end = depth == 0
                && (tok.kind == TokenKind::Semi
                    || tok.kind == TokenKind::String
                    || tok.is_punct(",")
                    || tok.is_punct(")")
                    || tok.is_punct("]")
                    || tok.is_punct("}"));
            if at_end {
                break;
            }
            if tok.kind == TokenKind::Punct {
                match tok.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
            end = tok.end_offset;
            let _ = self.next();
        }
        self.src[first.offset..end].to_string()
    }

    // ====================================================================
    // Struct fields
    // ====================================================================

    fn struct_body(&mut self) -> SyntaxResult<Vec<FieldDecl>> {
        self.expect_punct("{")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.peek_is_punct("}") {
                self.next()?;
                return Ok(fields);
            }
            fields.push(self.field_decl()?);
        }
    }

    fn field_decl(&mut self) -> SyntaxResult<FieldDecl> {
        let first = self
            .peek()
            .cloned()
            .ok_or_else(|| SyntaxError::new(self.line(), "unterminated struct"))?;

        let embedded = first.is_punct("*")
            || (first.kind == TokenKind::Ident
                && self.peek_n(1).is_none_or(|t| {
                    t.kind == TokenKind::Semi
                        || t.kind == TokenKind::String
                        || t.is_punct("}")
                        || t.is_punct(".")
                }));

        let mut names = Vec::new();
        if !embedded {
            loop {
                names.push(self.expect_ident()?);
                if self.peek_is_punct(",") {
                    self.next()?;
                } else {
                    break;
                }
            }
        }
        let ty = self.type_expr()?;

        let tag = match self.peek() {
            Some(t) if t.kind == TokenKind::String => Some(self.next()?.text),
            _ => None,
        };
        self.end_of_item()?;

        Ok(FieldDecl {
            names,
            ty,
            tag,
            line: first.line,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
