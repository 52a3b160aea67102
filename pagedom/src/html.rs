//! HTML parsing into a [`Document`].
//!
//! Markup is parsed with `scraper` (html5ever) and converted into the arena.
//! `<script>` elements are dropped; nothing is ever executed.

use scraper::{ElementRef, Html};

use crate::{Document, Element};

impl Document {
    /// Parses a complete HTML document.
    pub fn parse_html(html: &str) -> Document {
        let parsed = Html::parse_document(html);
        let root = convert(parsed.root_element());
        log::trace!("parsed html document ({} bytes)", html.len());
        Document::from_element(root)
    }
}

fn convert(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut out = Element::new(value.name());
    for (name, attribute) in value.attrs() {
        out = out.attr(name, attribute);
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() == "script" {
                continue;
            }
            out = out.child(convert(child_element));
        } else if let Some(text) = child.value().as_text() {
            out = out.text(&*text.text);
        }
    }
    out
}
