//! Parsing of interactive selection strings.
//!
//! The UI layer hands over strings like `"1,3,5-8,10"` and expects an index
//! set back. The grammar is `<int>(-<int>)?(,<int>(-<int>)?)*` with inclusive
//! ranges. Historically there were two call sites with different behavior on
//! malformed tokens (one aborted, one silently skipped); every caller now
//! declares which policy it wants instead.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Errors raised by strict-mode range parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid token '{0}' in selection")]
    InvalidToken(String),

    #[error("Invalid range {start}-{end}: start must not exceed end")]
    ReversedRange { start: usize, end: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// How a call site wants malformed tokens handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Any malformed token aborts parsing.
    Strict,
    /// Malformed tokens are skipped and parsing continues.
    Lenient,
}

/// Parse a comma/range selection string into an ordered set of distinct
/// positive indices.
///
/// Ranges are inclusive on both ends. Blank input yields an empty set under
/// both policies. Whitespace around tokens is tolerated.
pub fn parse_ranges(input: &str, policy: ParsePolicy) -> ParseResult<BTreeSet<usize>> {
    let mut indices = BTreeSet::new();
    if input.trim().is_empty() {
        return Ok(indices);
    }

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            match policy {
                ParsePolicy::Strict => return Err(ParseError::InvalidToken(token.to_string())),
                ParsePolicy::Lenient => continue,
            }
        }

        match parse_token(token) {
            Ok(Token::Single(n)) => {
                indices.insert(n);
            }
            Ok(Token::Range(start, end)) => {
                indices.extend(start..=end);
            }
            Err(err) => match policy {
                ParsePolicy::Strict => return Err(err),
                ParsePolicy::Lenient => continue,
            },
        }
    }

    Ok(indices)
}

enum Token {
    Single(usize),
    Range(usize, usize),
}

fn parse_token(token: &str) -> ParseResult<Token> {
    match token.split_once('-') {
        Some((lhs, rhs)) => {
            let start = parse_index(lhs.trim(), token)?;
            let end = parse_index(rhs.trim(), token)?;
            if start > end {
                return Err(ParseError::ReversedRange { start, end });
            }
            Ok(Token::Range(start, end))
        }
        None => Ok(Token::Single(parse_index(token, token)?)),
    }
}

fn parse_index(raw: &str, token: &str) -> ParseResult<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::InvalidToken(token.to_string()))
}

static SEARCH_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-áéíóúñÁÉÍÓÚÑ]").unwrap());

const FORBIDDEN_PATTERNS: &[&str] = &[";", "--", "/*", "*/", "exec", "drop", "delete", "update"];

/// Sanitize a caption search string before it touches query text.
///
/// Returns `None` when the input contains a forbidden pattern; otherwise the
/// input with non-word characters stripped.
pub fn sanitize_search(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(String::new());
    }
    let lowered = trimmed.to_lowercase();
    if FORBIDDEN_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return None;
    }
    Some(SEARCH_CHARS.replace_all(trimmed, "").into_owned())
}
