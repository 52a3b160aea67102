use super::Element;

/// A child of a detached [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Content {
    /// Concatenated text of this subtree.
    pub fn text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Element(element) => element.text_content(),
        }
    }
}

impl From<Element> for Content {
    fn from(element: Element) -> Self {
        Content::Element(element)
    }
}
