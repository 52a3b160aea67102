//! A fetched page reduced to owned checkbox snapshots.

use pagedom::{Document, Element, Selector};
use url::Url;

use super::discover::resolve;
use crate::index::{DEFAULT_STRATEGIES, extract_label};
use crate::markup;

/// One checkbox item found on a fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageItem {
    pub group: String,
    pub label: String,
    /// Detached copy of the item (or its `.w-dyn-item` wrapper).
    pub fragment: Element,
}

/// A parsed pagination page.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub page_number: u32,
    pub url: Url,
    pub items: Vec<PageItem>,
    pub next_url: Option<Url>,
}

impl LoadedPage {
    /// Parses `html` and keeps the items of the `container_index`-th
    /// seamless container (the whole page when it has no such container).
    pub fn parse(html: &str, url: &Url, container_index: usize, page_number: u32) -> Self {
        let document = Document::parse_html(html);
        let containers =
            document.query_selector_all(document.root(), &markup::seamless_containers());
        let scope = containers
            .get(container_index)
            .copied()
            .unwrap_or_else(|| document.root());

        let wrapper = Selector::class(markup::ITEM_WRAPPER_CLASS);
        let items = document
            .query_selector_all(scope, &markup::checkbox_items())
            .into_iter()
            .filter_map(|node| {
                let group = document.attribute(node, markup::CHECKBOX_FILTER)?.to_string();
                let label = extract_label(&document, node, DEFAULT_STRATEGIES);
                let root = document
                    .closest(node, &wrapper)
                    .filter(|w| document.contains(scope, *w))
                    .unwrap_or(node);
                Some(PageItem {
                    group,
                    label,
                    fragment: document.export(root)?,
                })
            })
            .collect();

        let next_url = document
            .query_selector(scope, &Selector::class(markup::NEXT_LINK_CLASS))
            .and_then(|link| document.attribute(link, "href"))
            .filter(|href| !href.trim().is_empty() && !href.starts_with('#'))
            .and_then(|href| resolve(Some(url), href.trim()));

        Self {
            page_number,
            url: url.clone(),
            items,
            next_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div seamless-replace="true">
          <div class="w-dyn-list"><div class="w-dyn-items">
            <div class="w-dyn-item">
              <label checkbox-filter="locality" class="w-checkbox">
                <div class="w-checkbox-input"></div>
                <input type="checkbox"><span class="w-form-label">Jenin</span>
              </label>
            </div>
            <div class="w-dyn-item">
              <label checkbox-filter="locality" class="w-checkbox">
                <input type="checkbox"><span class="w-form-label">Tubas</span>
              </label>
            </div>
          </div></div>
          <a class="w-pagination-next" href="?p=3">Next</a>
        </div>
        <div seamless-replace="true">
          <label checkbox-filter="type"><span class="w-form-label">Other</span></label>
        </div>
    </body></html>"#;

    #[test]
    fn test_parse_scopes_to_container() {
        let url = Url::parse("https://site.test/list?p=2").unwrap();
        let page = LoadedPage::parse(PAGE, &url, 0, 2);

        let labels: Vec<&str> = page.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["Jenin", "Tubas"]);
        assert!(page.items.iter().all(|item| item.group == "locality"));
        assert!(page.items[0].fragment.has_class("w-dyn-item"));
        assert_eq!(page.next_url.unwrap().as_str(), "https://site.test/list?p=3");
    }

    #[test]
    fn test_parse_second_container() {
        let url = Url::parse("https://site.test/list?p=2").unwrap();
        let page = LoadedPage::parse(PAGE, &url, 1, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].group, "type");
        assert!(page.next_url.is_none());
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        let url = Url::parse("https://site.test/").unwrap();
        let page = LoadedPage::parse("not really <html", &url, 0, 2);
        assert!(page.items.is_empty());
        assert!(page.next_url.is_none());
    }
}
