//! Property file loading, compatible with Java-style `.properties` syntax.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::SmvError;

/// Flat string-to-string property mapping produced by one configuration
/// source. Backed by a `BTreeMap` so iteration order is deterministic.
pub type PropertyMap = BTreeMap<String, String>;

/// Load a property file into a [`PropertyMap`].
///
/// A path that does not name an existing regular file yields an empty map:
/// every file in the configuration lookup chain is optional. A file that
/// exists but cannot be parsed fails with [`SmvError::ConfigRead`]. When the
/// same key appears more than once, the last occurrence wins.
pub fn load_props(path: &Path) -> Result<PropertyMap, SmvError> {
    Ok(load_entries(path)?.into_iter().collect())
}

/// Load a property file as an ordered list of `(key, value)` entries.
///
/// Same syntax and optional-file policy as [`load_props`], but file order and
/// duplicate keys are preserved for callers that care about declaration
/// order.
pub(crate) fn load_entries(path: &Path) -> Result<Vec<(String, String)>, SmvError> {
    if !path.is_file() {
        tracing::debug!("property file {} not present, skipping", path.display());
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).map_err(|e| SmvError::ConfigRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|_| SmvError::ConfigRead {
        path: path.to_path_buf(),
        reason: "file is not valid UTF-8".to_string(),
    })?;
    parse_entries(&text).map_err(|reason| SmvError::ConfigRead {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse `.properties` text into ordered entries.
///
/// Supported syntax: `#` and `!` comment lines, blank lines, the first
/// unescaped `=`, `:`, or whitespace as the key/value separator (after a
/// whitespace separator a directly following `=` or `:` is consumed as
/// well, Java-style), backslash line continuation, and the escapes `\\`,
/// `\n`, `\t`, `\r`, and `\uXXXX`. A backslash before any other character
/// is dropped. A non-blank line with no separator is a key with an empty
/// value. Keys and values are trimmed on both sides; Java's preservation
/// of trailing value whitespace is the one deviation.
fn parse_entries(text: &str) -> Result<Vec<(String, String)>, String> {
    let mut entries = Vec::new();
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        // Fold continuation lines into one logical line.
        let mut logical = trimmed.to_string();
        while ends_with_odd_backslashes(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        let (raw_key, raw_value) = split_separator(&logical);
        let key = unescape(raw_key.trim())?;
        let value = unescape(raw_value.trim())?;
        if key.is_empty() {
            continue;
        }
        entries.push((key, value));
    }
    Ok(entries)
}

/// A line whose trailing backslashes come in an odd count continues on the
/// next line; an even count is escaped backslash data.
fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=`, `:`, or whitespace character. After a
/// whitespace separator one directly following `=` or `:` belongs to the
/// separator too. A line with no separator at all is a bare key.
fn split_separator(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..idx], &line[idx + ch.len_utf8()..]),
            ' ' | '\t' | '\u{000C}' => {
                let mut rest = line[idx..].trim_start();
                if let Some(stripped) = rest.strip_prefix(['=', ':']) {
                    rest = stripped;
                }
                return (&line[..idx], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(format!("truncated unicode escape \"\\u{hex}\""));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("malformed unicode escape \"\\u{hex}\""))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("\\u{hex} is not a valid character"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
