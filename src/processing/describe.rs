//! Rich-text episode descriptions to plain text

use once_cell::sync::Lazy;
use regex::Regex;

static BREAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*(br|/p|/div|/h[1-6]|/li|/ul|/ol)\s*/?\s*>").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*li[^>]*>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());
static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML description into readable plain text
///
/// Block-level closing tags and `<br>` become line breaks, list items become
/// `- ` bullets, every other tag is dropped and common entities are decoded.
pub fn to_plain_text(html: &str) -> String {
    let text = html.replace("\r\n", "\n");
    let text = BREAK_TAG.replace_all(&text, "\n");
    let text = LIST_ITEM.replace_all(&text, "- ");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .collect();

    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(to_plain_text("Just words."), "Just words.");
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let html = "<p>First paragraph.</p><p>Second<br/>line</p>";
        assert_eq!(to_plain_text(html), "First paragraph.\nSecond\nline");
    }

    #[test]
    fn test_lists_and_links() {
        let html = r#"<ul><li>One</li><li><a href="https://x.example">Two</a></li></ul>"#;
        assert_eq!(to_plain_text(html), "- One\n- Two");
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            to_plain_text("Tom &amp; Jerry &#8211; &quot;live&quot; &#x263A; &amp;lt;"),
            "Tom & Jerry – \"live\" ☺ &lt;"
        );
    }

    #[test]
    fn test_collapses_whitespace_and_blank_lines() {
        let html = "<div>  spaced    out  </div>\n\n\n\n<div>end</div>";
        assert_eq!(to_plain_text(html), "spaced out\n\nend");
    }
}
