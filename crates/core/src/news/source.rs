use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://search.daum.net/search";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches one page of search results as markup.
#[async_trait::async_trait]
pub trait SearchPageSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<String>;
}

/// News search over HTTP: `GET {search_url}?w=news&q={keyword}&p={page}`.
#[derive(Debug, Clone)]
pub struct HttpSearchSource {
    http: reqwest::Client,
    search_url: String,
    user_agent: String,
}

impl HttpSearchSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let search_url = settings
            .news_search_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());

        let user_agent = settings
            .news_user_agent
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout_secs = settings.news_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build news search http client")?;

        Ok(Self {
            http,
            search_url,
            user_agent,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl SearchPageSource for HttpSearchSource {
    fn source_name(&self) -> &'static str {
        "daum_news_search"
    }

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<String> {
        let page_param = page.to_string();
        let res = self
            .http
            .get(&self.search_url)
            .headers(self.headers()?)
            .query(&[("w", "news"), ("q", keyword), ("p", page_param.as_str())])
            .send()
            .await
            .with_context(|| format!("news search request failed (page {page})"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read news search response (page {page})"))?;

        if !status.is_success() {
            anyhow::bail!("news search HTTP {status} (page {page})");
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_settings_are_blank() {
        let settings = Settings {
            news_search_url: Some("  ".to_string()),
            ..Default::default()
        };
        let source = HttpSearchSource::from_settings(&settings).unwrap();
        assert_eq!(source.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(source.user_agent, DEFAULT_USER_AGENT);
        let headers = source.headers().unwrap();
        assert_eq!(headers.get(USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
    }
}
