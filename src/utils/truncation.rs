const MAX_EVIDENCE_LENGTH: usize = 300;
const MAX_ERROR_LENGTH: usize = 2_000;

/// Cut `text` to at most `max` bytes on a char boundary, appending an
/// ellipsis marker when anything was dropped.
pub fn truncate_to(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated {} bytes]", &text[..end], text.len() - end)
}

/// Single-line response excerpt suitable for vulnerability evidence.
pub fn evidence_snippet(body: &str) -> String {
    let flat: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_to(&flat, MAX_EVIDENCE_LENGTH)
}

pub fn truncate_error(error: &str) -> String {
    truncate_to(error, MAX_ERROR_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_to("hello", 10), "hello");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        let out = truncate_to("aé bc", 2);
        assert!(out.starts_with("a..."));
    }

    #[test]
    fn test_evidence_snippet_flattens_whitespace() {
        let body = "Error: boom\n    at handler (/app/src/app.js:10:5)\n";
        assert_eq!(evidence_snippet(body), "Error: boom at handler (/app/src/app.js:10:5)");
    }

    #[test]
    fn test_evidence_snippet_caps_length() {
        let body = "x".repeat(5_000);
        let snippet = evidence_snippet(&body);
        assert!(snippet.len() < 400);
        assert!(snippet.contains("[truncated"));
    }
}
