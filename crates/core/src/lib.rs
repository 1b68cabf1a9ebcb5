pub mod dataset;
pub mod domain;
pub mod news;
pub mod pipeline;
pub mod scoring;

pub mod config {
    use anyhow::Context;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub data_path: Option<PathBuf>,
        pub sentry_dsn: Option<String>,
        pub news_search_url: Option<String>,
        pub news_user_agent: Option<String>,
        pub news_link_domain: Option<String>,
        pub news_timeout_secs: Option<u64>,
        pub news_req_delay_ms: Option<u64>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                data_path: std::env::var("RATECMP_DATA_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                news_search_url: std::env::var("NEWS_SEARCH_URL").ok(),
                news_user_agent: std::env::var("NEWS_USER_AGENT").ok(),
                news_link_domain: std::env::var("NEWS_LINK_DOMAIN").ok(),
                news_timeout_secs: parse_env("NEWS_TIMEOUT_SECS")?,
                news_req_delay_ms: parse_env("NEWS_REQ_DELAY_MS")?,
            })
        }

        pub fn data_path(&self) -> Option<&Path> {
            self.data_path.as_deref()
        }
    }

    fn parse_env(key: &str) -> anyhow::Result<Option<u64>> {
        match std::env::var(key) {
            Ok(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .with_context(|| format!("{key} must be a non-negative integer (got {s:?})")),
            _ => Ok(None),
        }
    }
}
