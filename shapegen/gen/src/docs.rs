//! Schema documentation to `#[doc]` attributes.
//!
//! Service descriptions carry HTML fragments. Paragraph and line breaks
//! become newlines, all other tags are dropped and entities are decoded.
//! The result is plain text; no Markdown rendering is attempted.

use std::sync::LazyLock;

use proc_macro2::TokenStream;
use quote::quote;
use regex::Regex;

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p>|<br\s*/?>|</li>|</ul>|</ol>").expect("Invalid break regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Converts an HTML fragment into doc comment lines.
///
/// Each line has a leading space so it renders as `/// text`. Runs of blank
/// lines collapse to one and leading or trailing blank lines are removed.
///
/// ## Examples
///
/// ```
/// use shapegen_gen::docs::doc_lines;
///
/// let lines = doc_lines("<p>Returns a <code>Widget</code>.</p><p>Fails if &lt;id&gt; is unknown.</p>");
/// assert_eq!(lines, vec![" Returns a Widget.", "", " Fails if <id> is unknown."]);
/// ```
pub fn doc_lines(html: &str) -> Vec<String> {
    let broken = BREAK_RE.replace_all(html, "\n\n");
    let stripped = TAG_RE.replace_all(&broken, "");
    let text = html_escape::decode_html_entities(&stripped);

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push(String::new());
            }
        } else {
            lines.push(format!(" {line}"));
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// `#[doc = "..."]` attributes for optional documentation.
pub fn doc_attrs(documentation: Option<&str>) -> TokenStream {
    let lines = documentation.map(doc_lines).unwrap_or_default();
    quote! { #(#[doc = #lines])* }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let lines = doc_lines("<p>The <b>size</b> in bytes &amp; more.</p>");
        assert_eq!(lines, vec![" The size in bytes & more."]);
    }

    #[test]
    fn list_items_become_lines() {
        let lines = doc_lines("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(lines, vec![" one", "", " two"]);
    }

    #[test]
    fn empty_documentation_has_no_lines() {
        assert!(doc_lines("").is_empty());
        assert!(doc_lines("<p></p>").is_empty());
        assert!(doc_attrs(None).is_empty());
    }

    #[test]
    fn attributes_are_generated_per_line() {
        let tokens = doc_attrs(Some("<p>First.</p><p>Second.</p>"));
        let rendered = tokens.to_string();
        assert!(rendered.contains("\" First.\""));
        assert!(rendered.contains("\" Second.\""));
    }
}
