//! # Struct Tag Directives
//!
//! A field tag such as `` `db:"unique" size:"32" default:"''"` `` is split
//! into `key:"value"` pairs by [`parse_tag`], turned into typed
//! [`Directive`]s, and applied to the column and its table in the order they
//! were written by [`interpret`].
//!
//! | directive | effect |
//! |---|---|
//! | `db:"-"` | the field is not a column |
//! | `db:"pk"` | primary key |
//! | `db:"unique"` | appended to the unique index |
//! | `size:"N"` | `limit:N` |
//! | `default:"V"` | `default:V` |
//! | `column:"Name"` | rename the column |
//! | `refer:"X"` | foreign key; renames to `X`, or derives the association from the name |
//!
//! Keys used by other libraries (`json`, `yaml`, ...) are ignored.

use tagmigrate_ir::{Column, Table};
use tagmigrate_syntax::unquote;
use thiserror::Error;

/// A tag that does not follow the `key:"value" key:"value"` convention
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TagSyntaxError(pub String);

/// One raw `key:"value"` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

// ============================================================================
// Parsing
// ============================================================================

/// Split a tag literal (backquoted or double-quoted) into key/value pairs
pub fn parse_tag(literal: &str) -> Result<Vec<TagPair>, TagSyntaxError> {
    let body = unquote(literal)
        .ok_or_else(|| TagSyntaxError(format!("invalid tag literal {}", literal)))?;
    parse_tag_body(&body)
}

/// Split an already unquoted tag body into key/value pairs
pub fn parse_tag_body(body: &str) -> Result<Vec<TagPair>, TagSyntaxError> {
    let mut pairs = Vec::new();
    let mut rest = body;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return Ok(pairs);
        }

        let key_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if key_len == 0 {
            return Err(TagSyntaxError(format!("expected key at '{}'", rest)));
        }
        let key = &rest[..key_len];
        rest = &rest[key_len..];

        rest = rest
            .strip_prefix(':')
            .ok_or_else(|| TagSyntaxError(format!("missing ':' after key '{}'", key)))?;
        if !rest.starts_with('"') {
            return Err(TagSyntaxError(format!("value of '{}' is not quoted", key)));
        }

        let close = closing_quote(rest)
            .ok_or_else(|| TagSyntaxError(format!("unterminated value for key '{}'", key)))?;
        let value = unquote(&rest[..=close])
            .ok_or_else(|| TagSyntaxError(format!("invalid escape in value of '{}'", key)))?;
        rest = &rest[close + 1..];

        pairs.push(TagPair {
            key: key.to_string(),
            value,
        });
    }
}

/// Byte index of the quote closing the value that opens at index 0
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

// ============================================================================
// Directives
// ============================================================================

/// A tag pair this tool understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `db:"-"`
    Skip,
    /// `db:"pk"`
    PrimaryKey,
    /// `db:"unique"`
    Unique,
    /// `size:"N"`
    Size(String),
    /// `default:"V"`
    Default(String),
    /// `column:"Name"`
    Column(String),
    /// `refer:"X"`
    Refer(String),
    /// Any other key or `db` value
    Ignored(TagPair),
}

impl Directive {
    pub fn from_pair(pair: &TagPair) -> Result<Self, TagSyntaxError> {
        let directive = match (pair.key.as_str(), pair.value.as_str()) {
            ("db", "-") => Directive::Skip,
            ("db", "pk") => Directive::PrimaryKey,
            ("db", "unique") => Directive::Unique,
            ("size", _) => Directive::Size(pair.value.clone()),
            ("default", _) => Directive::Default(pair.value.clone()),
            ("column", "") => {
                return Err(TagSyntaxError("column name must not be empty".to_string()));
            }
            ("column", _) => Directive::Column(pair.value.clone()),
            ("refer", _) => Directive::Refer(pair.value.clone()),
            _ => Directive::Ignored(pair.clone()),
        };
        Ok(directive)
    }
}

/// Parse a tag literal straight into directives
pub fn parse_directives(literal: &str) -> Result<Vec<Directive>, TagSyntaxError> {
    parse_tag(literal)?
        .iter()
        .map(Directive::from_pair)
        .collect()
}

// ============================================================================
// Interpretation
// ============================================================================

/// Whether the field still produces a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SkipField,
}

/// Table keys registered by the field being interpreted, so a later rename
/// can follow them
#[derive(Default)]
struct Claims {
    primary_key: bool,
    unique: Vec<usize>,
}

impl Claims {
    /// Withdraw the unique index entries; the primary key stays
    fn release_unique(&self, table: &mut Table) {
        for &i in self.unique.iter().rev() {
            if i < table.unique_index_columns.len() {
                table.unique_index_columns.remove(i);
            }
        }
    }

    fn rename(&self, table: &mut Table, old: &str, new: &str) {
        if self.primary_key && table.primary_key == old {
            table.primary_key = new.to_string();
        }
        for &i in &self.unique {
            if let Some(entry) = table.unique_index_columns.get_mut(i)
                && *entry == old
            {
                *entry = new.to_string();
            }
        }
    }
}

/// Apply directives left to right to `column` and `table`.
///
/// `db:"-"` stops immediately. Unique index entries registered by the same
/// field are withdrawn; a primary key registered before it is kept.
pub fn interpret(directives: &[Directive], column: &mut Column, table: &mut Table) -> Flow {
    let mut claims = Claims::default();

    for directive in directives {
        match directive {
            Directive::Skip => {
                claims.release_unique(table);
                return Flow::SkipField;
            }
            Directive::PrimaryKey => {
                table.set_primary_key(column.name.clone());
                claims.primary_key = true;
            }
            Directive::Unique => claims.unique.push(table.add_unique(column.name.clone())),
            Directive::Size(limit) => {
                column.options.limit = (!limit.is_empty()).then(|| limit.clone());
            }
            Directive::Default(value) => {
                column.options.default = (!value.is_empty()).then(|| value.clone());
            }
            Directive::Column(name) => {
                let old = std::mem::replace(&mut column.name, name.clone());
                claims.rename(table, &old, name);
            }
            Directive::Refer(target) => {
                let old = column.name.clone();
                column.make_reference(target);
                if column.name != old {
                    claims.rename(table, &old, &column.name);
                }
            }
            Directive::Ignored(_) => {}
        }
    }

    Flow::Continue
}

// ============================================================================
// Tests
// ============================================================================
