//! Browser drivers and the page scripts they inject.

pub mod chromium;

/// Script that reports whether `selector` matches anything.
pub fn exists_script(selector: &str) -> String {
    format!(
        "document.querySelector('{}') !== null",
        sanitize_js_string(selector)
    )
}

/// Script that clicks the first element under `scope` whose visible text is
/// exactly `text`, returning whether one was found.
pub fn click_text_script(scope: &str, text: &str) -> String {
    format!(
        r#"(() => {{
            const wanted = '{}';
            const el = Array.from(document.querySelectorAll('{}'))
                .find((e) => e.innerText === wanted || e.textContent === wanted);
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        sanitize_js_string(text),
        sanitize_js_string(scope)
    )
}

/// Escape a string for use inside a single- or double-quoted JS literal.
///
/// Null bytes are dropped and angle brackets are hex-escaped so the value can
/// never close a surrounding script tag.
pub fn sanitize_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}
            '<' => result.push_str("\\x3c"),
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_quotes_in_selectors() {
        assert_eq!(
            sanitize_js_string("[data-test='word-bank']"),
            "[data-test=\\'word-bank\\']"
        );
        assert_eq!(sanitize_js_string("a\"b"), "a\\\"b");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii_answers() {
        assert_eq!(sanitize_js_string("あ"), "あ");
        assert_eq!(sanitize_js_string("¿Qué tal?"), "¿Qué tal?");
    }

    #[test]
    fn test_sanitize_strips_null_and_escapes_tags() {
        assert_eq!(sanitize_js_string("ab\0c"), "abc");
        let sanitized = sanitize_js_string("</script>");
        assert!(!sanitized.contains("</script>"));
        assert_eq!(sanitized, "\\x3c/script\\x3e");
    }

    #[test]
    fn test_exists_script() {
        assert_eq!(
            exists_script("[data-test='skill-tree']"),
            "document.querySelector('[data-test=\\'skill-tree\\']') !== null"
        );
    }

    #[test]
    fn test_click_text_script_escapes_text() {
        let script = click_text_script("button", "it's");
        assert!(script.contains("const wanted = 'it\\'s';"));
        assert!(script.contains("querySelectorAll('button')"));
    }
}
