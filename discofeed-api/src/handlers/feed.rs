use actix_web::{web, HttpResponse, Result as ActixResult};
use extractors::DiscographyExtractor;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::FeedConfig;
use crate::helpers::page_cache::PageCache;
use crate::integrations::wikipedia::{FetchError, FetchedPage, WikipediaClient};
use crate::render::render_feed;

pub const MISSING_URL_MESSAGE: &str = "Please provide a URL parameter, e.g., ?url=The_Beatles.";

pub type FeedPageCache = PageCache<Arc<FetchedPage>>;

#[derive(Clone)]
pub struct FeedAppState {
    pub feed: FeedConfig,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub url: Option<String>,
}

/// Artist names may be given with spaces; Wikipedia slugs use underscores.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn fetch_error_response(e: FetchError) -> actix_web::Error {
    error!("{}", e);
    match e {
        FetchError::Timeout { .. } => actix_web::error::ErrorGatewayTimeout(e.to_string()),
        FetchError::Transport { .. } => actix_web::error::ErrorBadGateway(e.to_string()),
    }
}

async fn cached_page(
    slug: &str,
    client: &WikipediaClient,
    cache: &FeedPageCache,
) -> Result<Arc<FetchedPage>, FetchError> {
    let key = client.source_url(slug).to_string();
    if let Some(page) = cache.get(&key).await {
        debug!("Cache hit for {}", key);
        return Ok(page);
    }

    let page = Arc::new(client.fetch_page(slug).await?);
    cache.put(key, page.clone()).await;
    Ok(page)
}

pub async fn discography_feed(
    query: web::Query<FeedQuery>,
    state: web::Data<FeedAppState>,
    client: web::Data<Arc<WikipediaClient>>,
    cache: web::Data<Arc<FeedPageCache>>,
) -> ActixResult<HttpResponse> {
    let slug = query
        .into_inner()
        .url
        .map(|raw| normalize_slug(&raw))
        .unwrap_or_default();

    if slug.is_empty() {
        return Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(MISSING_URL_MESSAGE));
    }

    let page = cached_page(&slug, &client, &cache)
        .await
        .map_err(fetch_error_response)?;

    let document = page.document();
    let records = DiscographyExtractor::with_sections(state.feed.sections.clone())
        .extract(Some(&document));

    debug!("Rendering {} releases for {}", records.len(), slug);

    let body = render_feed(&page.title, &slug, &records, &state.feed);

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
