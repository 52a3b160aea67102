use std::collections::BTreeMap;

use super::Content;

/// A detached element subtree.
///
/// Used to build documents in code and to carry subtrees between documents
/// (see [`Document::export`](crate::Document::export) and
/// [`Document::append`](crate::Document::append)).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Inline style properties.
    pub style: BTreeMap<String, String>,
    /// Live `checked` property (inputs).
    pub checked: bool,
    /// Live `value` property (inputs).
    pub value: String,
    pub children: Vec<Content>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn label() -> Self {
        Self::new("label")
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new("a").attr("href", href)
    }

    pub fn checkbox() -> Self {
        Self::new("input").attr("type", "checkbox")
    }

    pub fn text_input() -> Self {
        Self::new("input").attr("type", "text")
    }

    // Identity
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Sets an attribute. `class` is split into the class list, `checked`
    /// and `value` also seed the matching properties.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "class" => {
                for class in value.split_whitespace() {
                    if !self.classes.iter().any(|c| c == class) {
                        self.classes.push(class.to_string());
                    }
                }
            }
            "style" => {
                for (property, property_value) in parse_inline_style(&value) {
                    self.style.insert(property, property_value);
                }
            }
            _ => {
                if name == "checked" {
                    self.checked = true;
                }
                if name == "value" {
                    self.value = value.clone();
                }
                self.attributes.insert(name, value);
            }
        }
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Content::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.children.iter().map(Content::text).collect()
    }
}

/// Splits `a: b; c: d` into property pairs.
pub(crate) fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}
