//! Response text extraction
//!
//! Backends often wrap structured replies in fenced code blocks
//! (```` ```json ... ``` ````). `strip_fences` removes the leading and
//! trailing fence lines plus surrounding whitespace so downstream parsing
//! sees bare text. Total function: text without fences passes through
//! unchanged.

/// Strip leading/trailing code fence markers and surrounding whitespace.
///
/// The leading fence may carry a language tag (```` ```json ````), which is
/// discarded along with the marker. Interior fences are left alone.
#[must_use]
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    let without_leading = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // Drop the language tag up to the end of the fence line
            match rest.split_once('\n') {
                Some((_tag, body)) => body,
                // A lone fence line with no body
                None => "",
            }
        }
        None => trimmed,
    };

    let without_trailing = match without_leading.trim_end().strip_suffix("```") {
        Some(body) => body,
        None => without_leading,
    };

    without_trailing.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(strip_fences("hello world"), "hello world");
    }

    #[test]
    fn test_strips_json_fence() {
        let raw = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(strip_fences(raw), "{\"title\": \"x\"}");
    }

    #[test]
    fn test_strips_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strips_surrounding_whitespace() {
        assert_eq!(strip_fences("  \n{\"a\": 1}\n  "), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_with_surrounding_whitespace() {
        let raw = "\n\n```json\n{\"a\": 1}\n```\n\n";
        assert_eq!(strip_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_interior_fences_untouched() {
        let raw = "before\n```rust\nfn main() {}\n```\nafter";
        assert_eq!(strip_fences(raw), raw);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_fences(""), "");
        assert_eq!(strip_fences("```"), "");
        assert_eq!(strip_fences("```json\n```"), "");
    }
}
