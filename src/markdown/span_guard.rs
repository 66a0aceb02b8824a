//! Span protection — swaps already-rendered `<span>` markup for opaque
//! placeholder tokens so a further matching pass cannot corrupt it.

/// Replace every `<span ...>...</span>` run with a placeholder token,
/// returning the tokenized text and the extracted markup in order.
pub(crate) fn extract_spans(input: &str) -> (String, Vec<String>) {
    let mut tokens: Vec<String> = Vec::new();
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some((start, end)) = find_span(rest) {
        out.push_str(&rest[..start]);
        out.push_str(&placeholder(tokens.len()));
        tokens.push(rest[start..end].to_string());
        rest = &rest[end..];
    }
    out.push_str(rest);

    (out, tokens)
}

/// Substitute each placeholder token back with its original markup.
/// First occurrence only, mirroring the single-use token contract.
pub(crate) fn restore_spans(input: &str, tokens: &[String]) -> String {
    let mut out = input.to_string();
    for (i, token) in tokens.iter().enumerate() {
        out = out.replacen(&placeholder(i), token, 1);
    }
    out
}

fn placeholder(index: usize) -> String {
    format!("\u{a7}\u{a7}SPAN{index}\u{a7}\u{a7}")
}

/// Locate the next complete `<span ...>...</span>` run. The body is matched
/// non-greedily: it ends at the first `</span>` after the opening tag.
fn find_span(s: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;
    while let Some(rel) = s[search_from..].find("<span") {
        let open = search_from + rel;
        let after_open = &s[open + "<span".len()..];
        if let Some(tag_end) = after_open.find('>') {
            let body_start = open + "<span".len() + tag_end + 1;
            if let Some(close) = s[body_start..].find("</span>") {
                return Some((open, body_start + close + "</span>".len()));
            }
        }
        search_from = open + "<span".len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_span() {
        let (tokenized, tokens) = extract_spans(r#"a <span class="md-bold">**b**</span> c"#);
        assert_eq!(tokenized, "a \u{a7}\u{a7}SPAN0\u{a7}\u{a7} c");
        assert_eq!(tokens, vec![r#"<span class="md-bold">**b**</span>"#]);
    }

    #[test]
    fn extracts_multiple_spans_in_order() {
        let input = r#"<span class="a">x</span>-<span class="b">y</span>"#;
        let (tokenized, tokens) = extract_spans(input);
        assert_eq!(tokenized, "\u{a7}\u{a7}SPAN0\u{a7}\u{a7}-\u{a7}\u{a7}SPAN1\u{a7}\u{a7}");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].contains('x'));
        assert!(tokens[1].contains('y'));
    }

    #[test]
    fn unclosed_span_left_alone() {
        let input = r#"before <span class="md-bold">**b** after"#;
        let (tokenized, tokens) = extract_spans(input);
        assert_eq!(tokenized, input);
        assert!(tokens.is_empty());
    }

    #[test]
    fn restore_round_trips() {
        let input = r#"a <span class="md-code">`x`</span> b <span class="md-italic">*y*</span>"#;
        let (tokenized, tokens) = extract_spans(input);
        assert_eq!(restore_spans(&tokenized, &tokens), input);
    }

    #[test]
    fn no_spans_passthrough() {
        let (tokenized, tokens) = extract_spans("plain text with no markup");
        assert_eq!(tokenized, "plain text with no markup");
        assert!(tokens.is_empty());
    }
}
