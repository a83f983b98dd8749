//! HTML-to-text normalization: the one external collaborator the core spec leans on for
//! reducing a page's markup to its inner text before tokenization.

use scraper::{Html, Selector};

/// Reduces `html` to its visible inner text: skips `<script>`/`<style>` content, collapses
/// whitespace within each block-level element, and joins block texts with newlines.
pub fn inner_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(block_selector) = Selector::parse("p, div, li, h1, h2, h3, h4, h5, h6, td, pre, body")
    else {
        return String::new();
    };
    let Ok(skip_selector) = Selector::parse("script, style") else {
        return collapse_document_text(&document);
    };

    let skip_texts: std::collections::HashSet<String> = document
        .select(&skip_selector)
        .map(|el| el.text().collect::<String>())
        .collect();

    let mut lines = Vec::new();
    for el in document.select(&block_selector) {
        let text = el.text().collect::<String>();
        if skip_texts.contains(&text) {
            continue;
        }
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

fn collapse_document_text(document: &Html) -> String {
    document
        .root_element()
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_content() {
        let html = "<html><body><p>hello</p><script>var x = 1;</script></body></html>";
        let text = inner_text(html);
        assert!(text.contains("hello"));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn collapses_internal_whitespace() {
        let html = "<html><body><p>hello   \n  world</p></body></html>";
        let text = inner_text(html);
        assert!(text.contains("hello world"));
    }
}
