//! Checkbox filter engine for paginated CMS collection lists.
//!
//! The engine indexes `[checkbox-filter]` items of a [`pagedom::Document`],
//! filters them with a fuzzy scorer, loads the remaining pages of seamless
//! (paginated) lists, persists checked state across re-renders and mirrors
//! the state of Finsweet's filter UI.
//!
//! # Example
//!
//! ```ignore
//! use seamless_lib::{FilterConfig, FilterEngine, HttpFetcher};
//!
//! let document = pagedom::Document::parse_html(&html);
//! let mut engine = FilterEngine::new(document, FilterConfig::default())
//!     .with_location(page_url);
//! engine.recache_elements();
//! engine.load_all_paginated_items(fetcher).await;
//! engine.filter_group("locality", "nabl");
//! engine.flush_updates();
//! ```

pub mod bridge;
pub mod clock;
pub mod config;
pub mod error;
pub mod index;
pub mod markup;
pub mod paginate;
pub mod persist;
pub mod reconcile;
pub mod schedule;
pub mod score;

mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FilterConfig;
pub use engine::*;
pub use error::{ConfigError, Error, FetchError};
pub use paginate::{HttpFetcher, PageFetcher};
