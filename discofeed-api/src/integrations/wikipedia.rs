use crate::config::WikipediaConfig;
use anyhow::{bail, Result};
use extractors::ParsedDocument;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::info;
use url::Url;

pub const ALBUMS_DISCOGRAPHY_SUFFIX: &str = "_albums_discography";
const DISCOGRAPHY_SUFFIX: &str = "_discography";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Raw response of the last fetch attempt, kept in the page cache.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub title: String,
}

impl FetchedPage {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }

    pub fn document(&self) -> ParsedDocument {
        ParsedDocument::parse(&self.body)
    }
}

/// Article titles tried for `slug`, in order.
pub fn article_titles(slug: &str) -> [String; 3] {
    [
        format!("{}{}", slug, ALBUMS_DISCOGRAPHY_SUFFIX),
        format!("{}{}", slug, DISCOGRAPHY_SUFFIX),
        slug.to_string(),
    ]
}

/// `title` appended to `base` as a single percent-encoded path segment.
fn article_url(base: &Url, title: &str) -> Url {
    let mut url = base.clone();
    // `WikipediaClient::new` rejects bases that cannot hold path segments
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(title);
    }
    url
}

#[derive(Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WikipediaClient {
    pub fn new(config: &WikipediaConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            bail!("wikipedia.base_url {} cannot hold article paths", config.base_url);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// `<base_url>/<slug>_albums_discography`, also used as the cache key.
    pub fn source_url(&self, slug: &str) -> Url {
        article_url(&self.base_url, &format!("{}{}", slug, ALBUMS_DISCOGRAPHY_SUFFIX))
    }

    /// Fetch the discography of `slug`, retrying the alternate titles while
    /// the answer is 404.
    ///
    /// The last response is returned even if it is still a 404.
    pub async fn fetch_page(&self, slug: &str) -> Result<FetchedPage, FetchError> {
        let [primary, fallbacks @ ..] = article_titles(slug);
        let mut page = self.get(article_url(&self.base_url, &primary)).await?;

        for title in fallbacks {
            if !page.is_not_found() {
                break;
            }
            let url = article_url(&self.base_url, &title);
            info!("{} not found, trying {}", page.url, url);
            page = self.get(url).await?;
        }

        Ok(page)
    }

    async fn get(&self, url: Url) -> Result<FetchedPage, FetchError> {
        let url_str = url.to_string();
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&url_str, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&url_str, e))?;
        let title = ParsedDocument::parse(&body).title().to_string();

        info!(status, url = %url_str, "Fetched page");

        Ok(FetchedPage {
            url: url_str,
            status,
            body,
            title,
        })
    }
}
