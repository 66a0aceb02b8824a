//! Editable surface model — the rendered markup as a tree of typed runs,
//! plus the caret mapping between plain-text offsets and tree positions.
//!
//! The mapping is a depth-first prefix-sum walk: consume text-run lengths
//! until the saved character offset is reached. This is the non-DOM
//! equivalent of walking a selection range through re-rendered nodes.

use serde::Serialize;

/// One node of the rendered surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceNode {
    /// An element (span/anchor); only its children matter for caret math.
    Element { children: Vec<SurfaceNode> },
    /// A text run, with entities decoded (lengths count rendered chars).
    Text(String),
}

/// A caret location in the surface tree: child indices from the root down
/// to a text run, plus a character offset inside that run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaretPosition {
    pub path: Vec<usize>,
    pub offset: usize,
}

/// Parse the highlight engine's own output into a surface tree. The markup
/// is well-formed by construction; a stray `<` without a closing `>` is
/// treated as literal text.
pub fn parse_surface(html: &str) -> SurfaceNode {
    let mut stack: Vec<Vec<SurfaceNode>> = vec![Vec::new()];
    let mut text = String::new();
    let mut rest = html;

    loop {
        match rest.find('<') {
            None => {
                decode_into(rest, &mut text);
                break;
            }
            Some(at) => {
                decode_into(&rest[..at], &mut text);
                let tag = &rest[at..];
                let Some(tag_end) = tag.find('>') else {
                    decode_into(tag, &mut text);
                    break;
                };
                flush_text(&mut text, &mut stack);
                if tag.starts_with("</") {
                    // Closing tag: fold the top frame into its parent.
                    if stack.len() > 1 {
                        let children = stack.pop().unwrap_or_default();
                        if let Some(parent) = stack.last_mut() {
                            parent.push(SurfaceNode::Element { children });
                        }
                    }
                } else {
                    stack.push(Vec::new());
                }
                rest = &rest[at + tag_end + 1..];
            }
        }
    }
    flush_text(&mut text, &mut stack);

    // Unbalanced opens fold into their parents at the end.
    while stack.len() > 1 {
        let children = stack.pop().unwrap_or_default();
        if let Some(parent) = stack.last_mut() {
            parent.push(SurfaceNode::Element { children });
        }
    }
    SurfaceNode::Element {
        children: stack.pop().unwrap_or_default(),
    }
}

fn flush_text(text: &mut String, stack: &mut Vec<Vec<SurfaceNode>>) {
    if text.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.push(SurfaceNode::Text(std::mem::take(text)));
    }
}

/// Decode the three entities the highlighter produces. Longest first so
/// `&amp;` never decodes twice.
fn decode_into(raw: &str, out: &mut String) {
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];
        if let Some(r) = tail.strip_prefix("&amp;") {
            out.push('&');
            rest = r;
        } else if let Some(r) = tail.strip_prefix("&lt;") {
            out.push('<');
            rest = r;
        } else if let Some(r) = tail.strip_prefix("&gt;") {
            out.push('>');
            rest = r;
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
}

/// Total plain-text length of the tree, in characters.
pub fn text_len(node: &SurfaceNode) -> usize {
    match node {
        SurfaceNode::Text(t) => t.chars().count(),
        SurfaceNode::Element { children } => children.iter().map(text_len).sum(),
    }
}

/// Resolve a plain-text character offset to a caret position by walking the
/// tree depth-first and consuming text-run lengths. Offsets past the end of
/// the text clamp to the end of the last run.
pub fn caret_path(root: &SurfaceNode, char_offset: usize) -> CaretPosition {
    let mut remaining = char_offset;
    let mut stack: Vec<(&SurfaceNode, Vec<usize>)> = vec![(root, Vec::new())];
    let mut last_text: Option<CaretPosition> = None;

    while let Some((node, path)) = stack.pop() {
        match node {
            SurfaceNode::Text(t) => {
                let len = t.chars().count();
                if remaining <= len {
                    return CaretPosition { path, offset: remaining };
                }
                remaining -= len;
                last_text = Some(CaretPosition { path, offset: len });
            }
            SurfaceNode::Element { children } => {
                // Reverse push so children come off the stack left to right.
                for (i, child) in children.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((child, child_path));
                }
            }
        }
    }

    last_text.unwrap_or(CaretPosition { path: Vec::new(), offset: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlight;

    #[test]
    fn parses_flat_text() {
        let tree = parse_surface("hello");
        assert_eq!(
            tree,
            SurfaceNode::Element {
                children: vec![SurfaceNode::Text("hello".into())]
            }
        );
    }

    #[test]
    fn parses_nested_spans() {
        let tree = parse_surface(r#"a<span class="x">b<span class="y">c</span></span>d"#);
        let SurfaceNode::Element { children } = &tree else {
            panic!("root must be an element");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], SurfaceNode::Text("a".into()));
        assert_eq!(children[2], SurfaceNode::Text("d".into()));
        let SurfaceNode::Element { children: inner } = &children[1] else {
            panic!("expected nested element");
        };
        assert_eq!(inner[0], SurfaceNode::Text("b".into()));
    }

    #[test]
    fn decodes_entities_in_text_runs() {
        let tree = parse_surface("a &amp; b &lt;c&gt;");
        assert_eq!(
            tree,
            SurfaceNode::Element {
                children: vec![SurfaceNode::Text("a & b <c>".into())]
            }
        );
    }

    #[test]
    fn text_len_counts_rendered_chars() {
        let tree = parse_surface(&highlight("**bold** & more"));
        assert_eq!(text_len(&tree), "**bold** & more".chars().count());
    }

    #[test]
    fn caret_maps_into_correct_run() {
        // "**bold** x" renders as <span>**bold**</span> then " x".
        let tree = parse_surface(&highlight("**bold** x"));
        let pos = caret_path(&tree, 2);
        // Offset 2 is inside the span's text run.
        assert_eq!(pos.path, vec![0, 0]);
        assert_eq!(pos.offset, 2);

        let pos = caret_path(&tree, 9);
        // Past the span (8 chars): lands in the trailing run.
        assert_eq!(pos.path, vec![1]);
        assert_eq!(pos.offset, 1);
    }

    #[test]
    fn caret_at_run_boundary_stays_in_left_run() {
        let tree = parse_surface(&highlight("**bold** x"));
        let pos = caret_path(&tree, 8);
        assert_eq!(pos.path, vec![0, 0]);
        assert_eq!(pos.offset, 8);
    }

    #[test]
    fn caret_clamps_to_end() {
        let tree = parse_surface(&highlight("abc"));
        let pos = caret_path(&tree, 999);
        assert_eq!(pos.path, vec![0]);
        assert_eq!(pos.offset, 3);
    }

    #[test]
    fn caret_in_empty_tree() {
        let tree = parse_surface("");
        let pos = caret_path(&tree, 5);
        assert_eq!(pos, CaretPosition { path: vec![], offset: 0 });
    }

    #[test]
    fn caret_counts_chars_not_bytes() {
        let tree = parse_surface(&highlight("жирный"));
        let pos = caret_path(&tree, 3);
        assert_eq!(pos.offset, 3);
    }
}
