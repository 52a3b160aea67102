//! Reading pagination hints from a container's markup.

use pagedom::{Document, NodeId, Selector};
use url::Url;

use crate::markup;

/// Pagination-relevant nodes and hints of one seamless container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLayout {
    pub container: NodeId,
    /// `.w-dyn-items` host receiving spliced items.
    pub items_host: Option<NodeId>,
    /// Raw `href` of the next-page link.
    pub next_href: Option<String>,
    /// Total page count, when a count element states one.
    pub total_pages: Option<u32>,
    pub searching_indicator: Option<NodeId>,
    pub empty_state: Option<NodeId>,
}

impl ContainerLayout {
    pub fn discover(document: &Document, container: NodeId) -> Self {
        let next_href = document
            .query_selector(container, &Selector::class(markup::NEXT_LINK_CLASS))
            .and_then(|link| document.attribute(link, "href"))
            .map(str::trim)
            .filter(|href| !href.is_empty() && !href.starts_with('#'))
            .map(str::to_string);
        let total_pages = document
            .query_selector(container, &markup::page_count())
            .and_then(|count| parse_page_count(&document.text_content(count)));

        Self {
            container,
            items_host: document
                .query_selector(container, &Selector::class(markup::ITEMS_HOST_CLASS)),
            next_href,
            total_pages,
            searching_indicator: document.query_selector(container, &markup::searching_indicator()),
            empty_state: document.query_selector(container, &markup::empty_state()),
        }
    }

    /// Next-page URL resolved against `base`.
    pub fn next_url(&self, base: Option<&Url>) -> Option<Url> {
        resolve(base, self.next_href.as_deref()?)
    }
}

/// Resolves `href` against `base`; absolute hrefs need no base.
pub fn resolve(base: Option<&Url>, href: &str) -> Option<Url> {
    match base {
        Some(base) => base.join(href).ok(),
        None => Url::parse(href).ok(),
    }
}

/// Total page count from texts like `1 / 3`, `Page 2 of 7` or `4`.
///
/// The last number is the total; zero is not a page count.
pub fn parse_page_count(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<u32>().ok())
        .last()
        .filter(|total| *total > 0)
}

/// Query parameter that differs between the current page and the next one.
pub fn pagination_param(current: &Url, next: &Url) -> Option<String> {
    next.query_pairs().find_map(|(name, value)| {
        let unchanged = current
            .query_pairs()
            .any(|(current_name, current_value)| current_name == name && current_value == value);
        (!unchanged).then(|| name.into_owned())
    })
}

/// `origin + path + "?" + param + "=" + page`.
pub fn page_url(base: &Url, param: &str, page: u32) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(Some(&format!("{param}={page}")));
    url
}
