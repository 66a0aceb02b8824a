//! Strip pass — removes markdown delimiters from highlighted HTML while
//! keeping the styling spans, turns link spans into real anchors, and makes
//! the result renderable as a single block (`<br>` per line break).
//!
//! Input is always the output of [`super::highlight`]; behavior on arbitrary
//! HTML is undefined.

/// Inline delimiter table for the strip pass, applied in this order.
/// Italic appears twice: once per delimiter style.
const INLINE_DELIMS: &[(&str, &str, char)] = &[
    ("md-code", "`", '`'),
    ("md-bold-italic", "***", '*'),
    ("md-bold", "**", '*'),
    ("md-underline", "__", '_'),
    ("md-strike", "~~", '~'),
    ("md-italic", "*", '*'),
    ("md-italic", "_", '_'),
];

/// Strip markdown syntax out of highlighted HTML.
pub fn strip(html: &str) -> String {
    let mut out = html.to_string();

    for level in 1..=6 {
        let class = format!("md-h{level}");
        out = rewrite_spans(&out, &class, |inner| {
            let rest = strip_marker(inner, &"#".repeat(level))?;
            Some(format!("<span class=\"{class}\">{rest}</span>"))
        });
    }

    // List markers become the reference bullet glyph.
    out = rewrite_spans(&out, "md-list", |inner| {
        let mut chars = inner.chars();
        match chars.next() {
            Some('-' | '*' | '+') if chars.all(char::is_whitespace) => {
                Some("<span class=\"md-list\">\u{2022}</span>".to_string())
            }
            _ => None,
        }
    });

    out = rewrite_spans(&out, "md-quote", |inner| {
        let rest = strip_marker(inner, "&gt;")?;
        Some(format!("<span class=\"md-quote\">{rest}</span>"))
    });

    for (class, delim, excluded) in INLINE_DELIMS {
        out = rewrite_spans(&out, class, |inner| {
            let mid = inner.strip_prefix(delim)?.strip_suffix(delim)?;
            if mid.is_empty() || mid.contains(*excluded) {
                return None;
            }
            Some(format!("<span class=\"{class}\">{mid}</span>"))
        });
    }

    // Links drop the span wrapper in favor of an anchor carrying the class.
    out = rewrite_spans(&out, "md-link", |inner| {
        let (text, url) = link_parts(inner)?;
        Some(format!(
            "<a href=\"{url}\" target=\"_blank\" class=\"md-link\">{text}</a>"
        ))
    });

    out.replace('\n', "<br>\n")
}

/// One global pass over `html`: every `<span class="{class}">inner</span>`
/// occurrence (inner ends at the first `</span>`) is offered to `transform`,
/// which returns the full replacement or `None` to leave it untouched.
/// Scanning resumes after each replacement, like a global regex replace.
fn rewrite_spans<F>(html: &str, class: &str, transform: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let open = format!("<span class=\"{class}\">");
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(at) = rest.find(&open) {
        let body_start = at + open.len();
        let Some(close) = rest[body_start..].find("</span>") else {
            break;
        };
        let inner = &rest[body_start..body_start + close];
        match transform(inner) {
            Some(replacement) => {
                out.push_str(&rest[..at]);
                out.push_str(&replacement);
                rest = &rest[body_start + close + "</span>".len()..];
            }
            None => {
                out.push_str(&rest[..body_start]);
                rest = &rest[body_start..];
            }
        }
    }
    out.push_str(rest);

    out
}

/// Expect `marker` followed by at least one whitespace character; return the
/// remainder with the whitespace run consumed.
fn strip_marker<'a>(inner: &'a str, marker: &str) -> Option<&'a str> {
    let rest = inner.strip_prefix(marker)?;
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }
    Some(trimmed)
}

/// Split `[text](url)` into its parts; both must be non-empty and the
/// closing paren must end the span body.
fn link_parts(inner: &str) -> Option<(&str, &str)> {
    let rest = inner.strip_prefix('[')?;
    let text_end = rest.find(']')?;
    let text = &rest[..text_end];
    let after = rest[text_end + 1..].strip_prefix('(')?;
    let url_end = after.find(')')?;
    let url = &after[..url_end];
    if text.is_empty() || url.is_empty() || !after[url_end + 1..].is_empty() {
        return None;
    }
    Some((text, url))
}

#[cfg(test)]
mod tests {
    use super::super::highlight::highlight;
    use super::*;

    fn render(text: &str) -> String {
        strip(&highlight(text))
    }

    #[test]
    fn strips_headers() {
        let out = render("# Header 1\n## Header 2");
        assert!(out.contains(r#"<span class="md-h1">Header 1</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-h2">Header 2</span>"#), "{out}");
    }

    #[test]
    fn strips_bold() {
        assert!(render("**bold**").contains(r#"<span class="md-bold">bold</span>"#));
    }

    #[test]
    fn strips_italic_both_styles() {
        let out = render("*italic* and _also_");
        assert!(out.contains(r#"<span class="md-italic">italic</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-italic">also</span>"#), "{out}");
    }

    #[test]
    fn strips_code() {
        assert!(render("`code`").contains(r#"<span class="md-code">code</span>"#));
    }

    #[test]
    fn strips_bold_italic_underline_strike() {
        let out = render("***bi*** __u__ ~~s~~");
        assert!(out.contains(r#"<span class="md-bold-italic">bi</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-underline">u</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-strike">s</span>"#), "{out}");
    }

    #[test]
    fn link_becomes_anchor() {
        assert!(
            render("[text](url)")
                .contains(r#"<a href="url" target="_blank" class="md-link">text</a>"#)
        );
    }

    #[test]
    fn list_marker_becomes_bullet() {
        assert_eq!(render("- item"), "<span class=\"md-list\">\u{2022}</span> item");
    }

    #[test]
    fn strips_quote_marker() {
        assert!(render("> quote").contains(r#"<span class="md-quote">quote</span>"#));
    }

    #[test]
    fn quote_with_nested_construct() {
        let out = render("> has **bold** inside");
        assert!(out.contains(r#"<span class="md-bold">bold</span>"#), "{out}");
        assert!(!out.contains("&gt;"), "quote marker should be gone: {out}");
    }

    #[test]
    fn newlines_become_br() {
        let out = render("line1\nline2\n\nline4");
        assert!(out.contains("line1<br>\nline2<br>\n<br>\nline4"), "{out}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn complex_document() {
        let out = render("# Title\n\n**Bold** and *italic* text.\n\n- List item\n\n`code` [link](url)");
        assert!(out.contains(r#"<span class="md-h1">Title</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-bold">Bold</span>"#), "{out}");
        assert!(out.contains(r#"<span class="md-italic">italic</span>"#), "{out}");
        assert!(out.contains("<span class=\"md-list\">\u{2022}</span> List item"), "{out}");
        assert!(out.contains(r#"<span class="md-code">code</span>"#), "{out}");
        assert!(out.contains(r#"<a href="url" target="_blank" class="md-link">link</a>"#), "{out}");
    }

    #[test]
    fn escaped_url_ampersand_survives() {
        let out = render("[link](http://e.com/?a=1&b=2)");
        assert!(
            out.contains(r#"<a href="http://e.com/?a=1&amp;b=2" target="_blank" class="md-link">link</a>"#),
            "{out}"
        );
    }
}
