//! String utilities for persistence keys and attribute markup.

/// Lowercase a string and strip everything outside `[a-z0-9_-]`.
///
/// Used for metabox ids and storage keys, so arbitrary display names
/// cannot leak markup or separators into the persistence layer.
pub fn sanitize_key(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Escape a string for use inside a double-quoted HTML attribute.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_key_lowercases_and_strips() {
        assert_eq!(sanitize_key("My Box!"), "mybox");
        assert_eq!(sanitize_key("event_details"), "event_details");
        assert_eq!(sanitize_key("Box-2.0"), "box-20");
    }

    #[test]
    fn escape_attr_covers_markup_characters() {
        assert_eq!(
            escape_attr(r#"a "quoted" <tag> & 'single'"#),
            "a &quot;quoted&quot; &lt;tag&gt; &amp; &#039;single&#039;"
        );
    }

    #[test]
    fn escape_attr_passes_plain_text_through() {
        assert_eq!(escape_attr("plain text-123"), "plain text-123");
    }
}
