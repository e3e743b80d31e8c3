// src/mdx/escape.rs

/// Bracket-escape an identifier token, idempotently.
///
/// Already-bracketed tokens (including multi-segment unique names such as
/// `[Dim].[Hier]`) are left unchanged.
pub fn bracket(token: &str) -> String {
    if token.starts_with('[') {
        token.to_string()
    } else {
        format!("[{token}]")
    }
}

/// Strip every bracket character from a path segment.
pub fn strip_brackets(segment: &str) -> String {
    segment.replace(['[', ']'], "")
}

/// Last segment of a bracketed path, without brackets.
///
/// `[D Clues].[Unidad médica]` → `Unidad médica`.
pub fn tail_segment(path: &str) -> String {
    let tail = path.rsplit('.').next().unwrap_or(path);
    strip_brackets(tail)
}
