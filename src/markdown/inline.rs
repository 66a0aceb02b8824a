//! Inline construct matching with overlap resolution.
//!
//! Not a parser: every pattern is tried at every position of the (span
//! protected) line, producing an overlapping candidate list that is then
//! resolved by a sort + greedy left-to-right scan. An unclosed delimiter
//! simply never produces a candidate and stays literal text.

use super::span_guard::{extract_spans, restore_spans};

/// A candidate inline annotation over the tokenized line.
/// `start`/`end` are byte offsets; delimiters are ASCII so candidate
/// boundaries always fall on character boundaries.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    priority: usize,
    class: &'static str,
}

enum Pattern {
    /// Symmetric delimiter pair; inner content is non-empty and excludes
    /// the delimiter character.
    Wrapped {
        delim: &'static str,
        excluded: u8,
        class: &'static str,
    },
    /// `[text](url)` with non-empty text and url.
    Link { class: &'static str },
}

/// Priority order: lower index wins on start-position ties.
const PATTERNS: &[Pattern] = &[
    Pattern::Wrapped { delim: "`", excluded: b'`', class: "md-code" },
    Pattern::Wrapped { delim: "***", excluded: b'*', class: "md-bold-italic" },
    Pattern::Wrapped { delim: "**", excluded: b'*', class: "md-bold" },
    Pattern::Wrapped { delim: "__", excluded: b'_', class: "md-underline" },
    Pattern::Wrapped { delim: "~~", excluded: b'~', class: "md-strike" },
    Pattern::Wrapped { delim: "*", excluded: b'*', class: "md-italic" },
    Pattern::Wrapped { delim: "_", excluded: b'_', class: "md-italic" },
    Pattern::Link { class: "md-link" },
];

/// Apply inline highlighting to one line. Existing spans are protected by
/// placeholder tokens first, so output of a previous pass is never
/// re-matched.
pub(crate) fn process_inline(text: &str) -> String {
    let (tokenized, tokens) = extract_spans(text);

    let mut candidates = collect_candidates(&tokenized);
    if candidates.is_empty() {
        return restore_spans(&tokenized, &tokens);
    }

    // Start ascending, then priority, then longer match wins.
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.priority.cmp(&b.priority))
            .then((b.end - b.start).cmp(&(a.end - a.start)))
    });

    // Greedy non-overlapping selection: an accepted match blocks every
    // candidate starting before its end.
    let mut out = String::with_capacity(tokenized.len());
    let mut pos = 0;
    for c in &candidates {
        if c.start < pos {
            continue;
        }
        out.push_str(&tokenized[pos..c.start]);
        out.push_str("<span class=\"");
        out.push_str(c.class);
        out.push_str("\">");
        out.push_str(&tokenized[c.start..c.end]);
        out.push_str("</span>");
        pos = c.end;
    }
    out.push_str(&tokenized[pos..]);

    restore_spans(&out, &tokens)
}

fn collect_candidates(text: &str) -> Vec<Candidate> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    for (priority, pattern) in PATTERNS.iter().enumerate() {
        for start in 0..bytes.len() {
            let matched = match pattern {
                Pattern::Wrapped { delim, excluded, class } => {
                    match_wrapped(bytes, start, delim.as_bytes(), *excluded)
                        .map(|end| (end, *class))
                }
                Pattern::Link { class } => match_link(bytes, start).map(|end| (end, *class)),
            };
            if let Some((end, class)) = matched {
                candidates.push(Candidate { start, end, priority, class });
            }
        }
    }
    candidates
}

/// Match `delim inner delim` at `start`, where `inner` is a non-empty run
/// of bytes other than `excluded`. The run is maximal, which is exact here:
/// the closing delimiter is built from `excluded`, so a shorter run can
/// never expose one.
fn match_wrapped(bytes: &[u8], start: usize, delim: &[u8], excluded: u8) -> Option<usize> {
    if !bytes[start..].starts_with(delim) {
        return None;
    }
    let inner_start = start + delim.len();
    let mut pos = inner_start;
    while pos < bytes.len() && bytes[pos] != excluded {
        pos += 1;
    }
    if pos == inner_start || !bytes[pos..].starts_with(delim) {
        return None;
    }
    Some(pos + delim.len())
}

/// Match `[text](url)` at `start`; `text` excludes `]`, `url` excludes `)`,
/// both non-empty.
fn match_link(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'[') {
        return None;
    }
    let mut pos = start + 1;
    while pos < bytes.len() && bytes[pos] != b']' {
        pos += 1;
    }
    if pos == start + 1 || bytes.get(pos) != Some(&b']') || bytes.get(pos + 1) != Some(&b'(') {
        return None;
    }
    let url_start = pos + 2;
    pos = url_start;
    while pos < bytes.len() && bytes[pos] != b')' {
        pos += 1;
    }
    if pos == url_start || bytes.get(pos) != Some(&b')') {
        return None;
    }
    Some(pos + 1)
}
