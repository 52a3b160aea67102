//! Attribute and class names of the page markup contract.

use pagedom::Selector;

pub const CHECKBOX_FILTER: &str = "checkbox-filter";
pub const SEARCHBOX_FILTER: &str = "searchbox-filter";
pub const CLEAR_TEXT_INPUT: &str = "clear-text-input";
pub const SEAMLESS_REPLACE: &str = "seamless-replace";
pub const DATA_FILTERED: &str = "data-filtered";
/// Set on items spliced in from fetched pages.
pub const DATA_PAGINATED: &str = "data-paginated";

pub const FS_LIST_FIELD: &str = "fs-list-field";
pub const FS_LIST_VALUE: &str = "fs-list-value";
pub const FS_LIST_ELEMENT: &str = "fs-list-element";

pub const FORM_LABEL_CLASS: &str = "w-form-label";
pub const ITEMS_HOST_CLASS: &str = "w-dyn-items";
pub const ITEM_WRAPPER_CLASS: &str = "w-dyn-item";
pub const NEXT_LINK_CLASS: &str = "w-pagination-next";
pub const PAGE_COUNT_CLASS: &str = "w-pagination-count";
pub const CHECKBOX_VISUAL_CLASS: &str = "w-checkbox-input";
pub const ACTIVE_CLASS: &str = "is-list-active";
pub const REDIRECTED_CHECKED_CLASS: &str = "w--redirected-checked";

pub fn checkbox_items() -> Selector {
    Selector::attr(CHECKBOX_FILTER)
}

pub fn search_boxes() -> Selector {
    Selector::attr(SEARCHBOX_FILTER)
}

pub fn clear_buttons() -> Selector {
    Selector::attr(CLEAR_TEXT_INPUT)
}

pub fn checkbox_input() -> Selector {
    Selector::tag("input").and(Selector::attr_eq("type", "checkbox"))
}

pub fn seamless_containers() -> Selector {
    Selector::attr_eq(SEAMLESS_REPLACE, "true")
}

pub fn searching_indicator() -> Selector {
    Selector::attr_eq(SEAMLESS_REPLACE, "searching-indicator")
}

pub fn empty_state() -> Selector {
    Selector::attr_eq(SEAMLESS_REPLACE, "empty")
}

pub fn page_count() -> Selector {
    Selector::class(PAGE_COUNT_CLASS).or(Selector::attr_eq("fs-cmspagination-element", "count"))
}

pub fn foreign_tags() -> Selector {
    Selector::attr_eq(FS_LIST_ELEMENT, "tags")
}

pub fn foreign_tag_labels() -> Selector {
    Selector::attr_eq(FS_LIST_ELEMENT, "tag-label")
}

pub fn foreign_tag_remove() -> Selector {
    Selector::attr_eq(FS_LIST_ELEMENT, "tag-remove")
}

/// Checked inputs carrying a Finsweet field/value pair.
pub fn foreign_field_inputs() -> Selector {
    checkbox_input()
        .and(Selector::attr(FS_LIST_FIELD))
        .and(Selector::attr(FS_LIST_VALUE))
}
