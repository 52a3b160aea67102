//! Page load strategies.
//!
//! Both strategies yield pages in increasing page order, which is the order
//! the engine merges them in.

use std::collections::HashSet;
use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use url::Url;

use super::discover::page_url;
use super::fetch::PageFetcher;
use super::page::LoadedPage;
use crate::error::FetchError;

/// Everything a strategy needs to load one container's remaining pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Position of the container among the page's seamless containers.
    pub container_index: usize,
    /// URL of the page currently rendered.
    pub location: Url,
    pub next_url: Option<Url>,
    pub total_pages: Option<u32>,
    /// Query parameter carrying the page number.
    pub page_param: Option<String>,
    /// URLs never to fetch again.
    pub pages_loaded: HashSet<String>,
}

impl PagePlan {
    /// `true` when the plan supports computing every page URL up front.
    pub fn supports_parallel(&self) -> bool {
        self.total_pages.is_some() && self.page_param.is_some()
    }
}

/// Result of one page load attempt.
#[derive(Debug)]
pub enum PageOutcome {
    Loaded(LoadedPage),
    Failed {
        page_number: u32,
        url: Url,
        error: FetchError,
    },
}

impl PageOutcome {
    pub fn page_number(&self) -> u32 {
        match self {
            PageOutcome::Loaded(page) => page.page_number,
            PageOutcome::Failed { page_number, .. } => *page_number,
        }
    }
}

/// Produces the pages of a plan, in page order.
pub trait PageLoadStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn pages(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        plan: PagePlan,
    ) -> BoxStream<'static, PageOutcome>;
}

/// Follows next-page links one fetch at a time.
///
/// Stops at the last page, at the first failure, or when a URL repeats.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

impl PageLoadStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn pages(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        plan: PagePlan,
    ) -> BoxStream<'static, PageOutcome> {
        let pages = stream! {
            let mut visited = plan.pages_loaded;
            visited.insert(plan.location.to_string());
            let mut next = plan.next_url;
            let mut page_number = 2;

            while let Some(url) = next.take() {
                if !visited.insert(url.to_string()) {
                    log::debug!("pagination chain revisits {url}, stopping");
                    break;
                }
                match fetcher.fetch(&url).await {
                    Ok(body) => {
                        let page =
                            LoadedPage::parse(&body, &url, plan.container_index, page_number);
                        next = page.next_url.clone();
                        page_number += 1;
                        yield PageOutcome::Loaded(page);
                    }
                    Err(error) => {
                        yield PageOutcome::Failed { page_number, url, error };
                        break;
                    }
                }
            }
        };
        pages.boxed()
    }
}

/// Fetches pages `2..=total` concurrently, yielding them in page order.
#[derive(Debug, Clone, Copy)]
pub struct ParallelStrategy {
    pub max_in_flight: usize,
}

impl ParallelStrategy {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
        }
    }
}

impl PageLoadStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn pages(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        plan: PagePlan,
    ) -> BoxStream<'static, PageOutcome> {
        let (Some(total), Some(param)) = (plan.total_pages, plan.page_param.as_deref()) else {
            return stream::empty().boxed();
        };

        let urls: Vec<(u32, Url)> = (2..=total)
            .map(|page| (page, page_url(&plan.location, param, page)))
            .filter(|(_, url)| !plan.pages_loaded.contains(url.as_str()))
            .collect();
        let container_index = plan.container_index;

        // `buffered` keeps requests in flight concurrently but yields results
        // in input order.
        stream::iter(urls)
            .map(move |(page_number, url)| {
                let fetcher = Arc::clone(&fetcher);
                async move {
                    match fetcher.fetch(&url).await {
                        Ok(body) => PageOutcome::Loaded(LoadedPage::parse(
                            &body,
                            &url,
                            container_index,
                            page_number,
                        )),
                        Err(error) => PageOutcome::Failed {
                            page_number,
                            url,
                            error,
                        },
                    }
                }
            })
            .buffered(self.max_in_flight)
            .boxed()
    }
}

/// Picks parallel loading when the page count and parameter are known.
pub fn select_strategy(plan: &PagePlan, max_in_flight: usize) -> Box<dyn PageLoadStrategy> {
    if plan.supports_parallel() {
        Box::new(ParallelStrategy::new(max_in_flight))
    } else {
        Box::new(SequentialStrategy)
    }
}

/// A container's pending page loads, detached from the engine.
///
/// Hosts poll [`PaginationJob::into_stream`] and hand every outcome back to
/// the engine, which is free to handle user input in between.
pub struct PaginationJob {
    pub container: usize,
    pub plan: PagePlan,
    pub strategy: Box<dyn PageLoadStrategy>,
}

impl std::fmt::Debug for PaginationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationJob")
            .field("container", &self.container)
            .field("strategy", &self.strategy.name())
            .field("plan", &self.plan)
            .finish()
    }
}

/// Item of a [`PaginationJob`] stream.
#[derive(Debug)]
pub enum PageProgress {
    Page(PageOutcome),
    /// The strategy has no more pages; always the last item.
    Done,
}

impl PaginationJob {
    /// Streams `(container, progress)` pairs, ending with
    /// [`PageProgress::Done`].
    pub fn into_stream(
        self,
        fetcher: Arc<dyn PageFetcher>,
    ) -> BoxStream<'static, (usize, PageProgress)> {
        let container = self.container;
        self.strategy
            .pages(fetcher, self.plan)
            .map(PageProgress::Page)
            .chain(stream::once(async { PageProgress::Done }))
            .map(move |progress| (container, progress))
            .boxed()
    }
}
