//! Parser for `.properties` catalog resources
//!
//! Grammar: `#` and `!` start comment lines; a key ends at the first
//! unescaped `=`, `:` or whitespace; a trailing odd backslash continues the
//! logical line; `\t \n \r \f \\ \uXXXX` are escapes and any other escaped
//! character stands for itself. Later keys replace earlier ones.

use std::collections::HashMap;
use thiserror::Error;

/// Whitespace recognized between tokens
const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

/// A malformed line in a properties document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct PropertiesError {
    /// One-based line where the logical line starts
    pub line: usize,
    /// What is wrong with it
    pub message: String,
}

/// Parse a properties document into key/value pairs
pub fn parse_properties(content: &str) -> Result<HashMap<String, String>, PropertiesError> {
    let mut entries = HashMap::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
            continue;
        }

        let line = index + 1;
        let mut logical = trimmed.to_string();
        while has_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        entries.insert(unescape(key, line)?, unescape(value, line)?);
    }

    Ok(entries)
}

/// An odd number of trailing backslashes continues the line
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                let value = line[i + 1..].trim_start_matches(WHITESPACE);
                return (&line[..i], value);
            }
            ' ' | '\t' | '\u{c}' => {
                let rest = line[i..].trim_start_matches(WHITESPACE);
                let value = rest
                    .strip_prefix(['=', ':'])
                    .map_or(rest, |value| value.trim_start_matches(WHITESPACE));
                return (&line[..i], value);
            }
            _ => {}
        }
    }

    (line, "")
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                out.push(decode_unit(unit, &mut chars, line)?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16, PropertiesError> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return Err(malformed_unicode(line, &hex));
    }
    u16::from_str_radix(&hex, 16).map_err(|_| malformed_unicode(line, &hex))
}

/// Combine a `\uXXXX` unit with a following low surrogate when needed
fn decode_unit(
    unit: u16,
    chars: &mut std::str::Chars<'_>,
    line: usize,
) -> Result<char, PropertiesError> {
    if (0xD800..0xDC00).contains(&unit) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            let low = read_code_unit(&mut lookahead, line)?;
            if (0xDC00..0xE000).contains(&low) {
                *chars = lookahead;
                if let Some(Ok(c)) = char::decode_utf16([unit, low]).next() {
                    return Ok(c);
                }
            }
        }
    }

    Ok(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn malformed_unicode(line: usize, hex: &str) -> PropertiesError {
    PropertiesError {
        line,
        message: format!("malformed \\uxxxx encoding '\\u{hex}'"),
    }
}
