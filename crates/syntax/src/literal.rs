//! String literal decoding

/// Decode a Go string literal (raw or interpreted) to its value.
///
/// Returns `None` when the literal is not properly delimited or contains an
/// invalid escape sequence.
pub fn unquote(lit: &str) -> Option<String> {
    if lit.len() >= 2 && lit.starts_with('`') && lit.ends_with('`') {
        return Some(lit[1..lit.len() - 1].replace('\r', ""));
    }
    if lit.len() < 2 || !lit.starts_with('"') || !lit.ends_with('"') {
        return None;
    }

    let body = &lit[1..lit.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '"' => '"',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            d @ '0'..='7' => {
                let mut value = d.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_literal() {
        assert_eq!(unquote("`db:\"pk\"`").as_deref(), Some("db:\"pk\""));
    }

    #[test]
    fn test_interpreted_literal() {
        assert_eq!(
            unquote(r#""db:\"unique\" size:\"32\"""#).as_deref(),
            Some(r#"db:"unique" size:"32""#)
        );
        assert_eq!(unquote(r#""a\tb\x41é""#).as_deref(), Some("a\tbA\u{e9}"));
    }

    #[test]
    fn test_invalid_literals() {
        assert_eq!(unquote("db:\"pk\""), None);
        assert_eq!(unquote(r#""bad \q escape""#), None);
        assert_eq!(unquote("`"), None);
    }
}
