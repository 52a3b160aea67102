//! Compound selectors built from `tag`, `.class`, `#id`, `[attr]` and
//! `[attr="value"]` conditions, with alternatives. Combinators are not
//! supported.

use crate::document::ElementData;

/// One simple condition of a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Tag(String),
    Class(String),
    Id(String),
    HasAttr(String),
    AttrEq(String, String),
}

impl Condition {
    fn matches(&self, element: &ElementData) -> bool {
        match self {
            Condition::Tag(tag) => element.tag == *tag,
            Condition::Class(class) => element.has_class(class),
            Condition::Id(id) => element.attribute("id") == Some(id.as_str()),
            Condition::HasAttr(name) => element.attribute(name).is_some(),
            Condition::AttrEq(name, value) => element.attribute(name) == Some(value.as_str()),
        }
    }
}

/// A list of compound selectors; matches when any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Condition>>,
}

impl Selector {
    fn single(condition: Condition) -> Self {
        Self {
            alternatives: vec![vec![condition]],
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::single(Condition::Tag(tag.into().to_ascii_lowercase()))
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::single(Condition::Class(class.into()))
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::single(Condition::Id(id.into()))
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Self::single(Condition::HasAttr(name.into().to_ascii_lowercase()))
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(Condition::AttrEq(
            name.into().to_ascii_lowercase(),
            value.into(),
        ))
    }

    /// Narrows every alternative with the conditions of `other`'s first
    /// alternative (`a.and(b)` behaves like `ab`).
    pub fn and(mut self, other: Selector) -> Self {
        let extra = other.alternatives.into_iter().next().unwrap_or_default();
        for alternative in &mut self.alternatives {
            alternative.extend(extra.iter().cloned());
        }
        self
    }

    /// Adds `other`'s alternatives (`a.or(b)` behaves like `a, b`).
    pub fn or(mut self, other: Selector) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.alternatives
            .iter()
            .any(|conditions| conditions.iter().all(|c| c.matches(element)))
    }
}
