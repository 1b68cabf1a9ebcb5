pub mod html;
pub mod source;

use crate::config::Settings;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub use source::{HttpSearchSource, SearchPageSource};

pub const DEFAULT_KEYWORD: &str = "경제";
pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_LINK_DOMAIN: &str = "v.daum.net";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
}

/// What to do when a single page request fails. Neither option retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFailurePolicy {
    /// Stop the crawl and return the error.
    #[default]
    Abort,
    /// Log the failure and move on to the next page.
    Skip,
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_pages: u32,
    /// Substring an anchor's `href` must contain.
    pub link_domain: String,
    pub on_page_failure: PageFailurePolicy,
    /// Pause between consecutive page requests.
    pub req_delay: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            link_domain: DEFAULT_LINK_DOMAIN.to_string(),
            on_page_failure: PageFailurePolicy::Abort,
            req_delay: Duration::ZERO,
        }
    }
}

impl CrawlOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut out = Self::default();
        if let Some(domain) = settings
            .news_link_domain
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            out.link_domain = domain.to_string();
        }
        if let Some(ms) = settings.news_req_delay_ms {
            out.req_delay = Duration::from_millis(ms);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsReport {
    pub keyword: String,
    pub fetched_at: DateTime<Utc>,
    pub pages_requested: u32,
    pub failed_pages: Vec<u32>,
    /// Unique (title, link) pairs in first-seen order.
    pub headlines: Vec<Headline>,
}

/// Headlines on one result page: anchors pointing at `link_domain` with non-empty text.
/// Duplicates within the page are kept; [`crawl_news`] collapses them.
pub fn extract_headlines(markup: &str, link_domain: &str) -> Vec<Headline> {
    html::anchors(markup)
        .into_iter()
        .filter(|a| a.href.contains(link_domain) && !a.text.is_empty())
        .map(|a| Headline {
            title: a.text,
            link: a.href,
        })
        .collect()
}

/// Fetches pages `1..=max_pages` one after another and merges their headlines.
pub async fn crawl_news(
    source: &dyn SearchPageSource,
    keyword: &str,
    opts: &CrawlOptions,
) -> Result<NewsReport> {
    let mut seen: HashSet<Headline> = HashSet::new();
    let mut headlines = Vec::new();
    let mut failed_pages = Vec::new();

    for page in 1..=opts.max_pages {
        if page != 1 && !opts.req_delay.is_zero() {
            tokio::time::sleep(opts.req_delay).await;
        }

        let markup = match source.fetch_page(keyword, page).await {
            Ok(markup) => markup,
            Err(err) => match opts.on_page_failure {
                PageFailurePolicy::Abort => {
                    return Err(err.context(format!(
                        "{} crawl aborted at page {page}",
                        source.source_name()
                    )));
                }
                PageFailurePolicy::Skip => {
                    tracing::warn!(page, keyword, error = %err, "news page fetch failed; skipping page");
                    failed_pages.push(page);
                    continue;
                }
            },
        };

        let found = extract_headlines(&markup, &opts.link_domain);
        let before = headlines.len();
        for h in found {
            if seen.insert(h.clone()) {
                headlines.push(h);
            }
        }

        tracing::debug!(page, new = headlines.len() - before, total = headlines.len(), "parsed news page");
    }

    tracing::info!(
        keyword,
        pages = opts.max_pages,
        failed = failed_pages.len(),
        headlines = headlines.len(),
        "news crawl finished"
    );

    Ok(NewsReport {
        keyword: keyword.to_string(),
        fetched_at: Utc::now(),
        pages_requested: opts.max_pages,
        failed_pages,
        headlines,
    })
}
