/// Removes a markdown code fence the model sometimes wraps around JSON,
/// including its info string (` ```json `, ` ```JSON `...).
pub fn strip_code_blocks(s: &str) -> &str {
    let s = s.trim();
    let Some(body) = s.strip_prefix("```") else {
        return s;
    };
    let body = match body.find('\n') {
        Some(eol) if !body[..eol].trim_start().starts_with(['[', '{']) => &body[eol + 1..],
        _ => body,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
