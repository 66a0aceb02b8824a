pub mod editor;
pub mod error;
pub mod markdown;
pub mod player;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the stemnote-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: markdown to HTML with constructs wrapped in styling spans
/// and the delimiters kept visible (editor surface). Never errors.
#[wasm_bindgen]
pub fn highlight_markdown(text: &str) -> String {
    markdown::highlight(text)
}

/// WASM-exposed: remove the markdown delimiters from highlighted HTML,
/// keeping the styling spans (read-only rendering).
#[wasm_bindgen]
pub fn strip_markdown(html: &str) -> String {
    markdown::strip(html)
}

/// WASM-exposed: render markdown for the read-only viewer. The content must
/// be a string; anything else is a contract violation, not a coercion.
#[wasm_bindgen]
pub fn render_markdown(content: JsValue) -> Result<String, JsValue> {
    let text = content
        .as_string()
        .ok_or_else(|| JsValue::from_str("markdown viewer content must be a string"))?;
    Ok(markdown::render(&text))
}

/// WASM-exposed: highlight `text` for an editable surface and resolve
/// `caret_chars` (plain-text character offset) against the new markup.
/// Returns `{ html, caret: { path, offset } }`.
#[wasm_bindgen]
pub fn render_editable(text: &str, caret_chars: usize) -> Result<JsValue, JsValue> {
    #[derive(serde::Serialize)]
    struct Rendered {
        html: String,
        caret: editor::CaretPosition,
    }

    let (html, caret) = editor::render_surface(text, caret_chars);
    serde_wasm_bindgen::to_value(&Rendered { html, caret })
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn render_pipeline_matches_manual_composition() {
        let text = "# Title\n**bold**";
        assert_eq!(
            markdown::render(text),
            markdown::strip(&markdown::highlight(text))
        );
    }
}
