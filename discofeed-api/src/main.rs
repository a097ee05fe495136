use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use discofeed_api::config::ApiConfig;
use discofeed_api::handlers::{self, feed::FeedAppState, feed::FeedPageCache};
use discofeed_api::integrations::wikipedia::WikipediaClient;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Defaults to <config dir>/discofeed/api.toml
    #[arg(long)]
    config_path: Option<String>,
}

fn init_logging(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("discofeed-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file_path);

    let (config, config_path) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            ApiConfig::load_from(&path).map(|config| (config, path))
        }
        None => ApiConfig::load(),
    }
    .map_err(std::io::Error::other)?;

    tracing::info!("Loaded config from {}", config_path.display());

    let server_config = config.server();
    let wikipedia_config = config.wikipedia();
    let cache_config = config.cache();

    let client = Arc::new(
        WikipediaClient::new(&wikipedia_config).map_err(std::io::Error::other)?,
    );

    tracing::info!(
        "Page cache holds {} entries for {}s",
        cache_config.capacity,
        cache_config.ttl_secs
    );
    let ttl = cache_config.ttl().ok_or_else(|| {
        std::io::Error::other(format!("invalid cache.ttl_secs {}", cache_config.ttl_secs))
    })?;
    let cache: Arc<FeedPageCache> = Arc::new(FeedPageCache::new(cache_config.capacity, ttl));

    let state = FeedAppState {
        feed: config.feed(),
    };

    tracing::info!(
        "Server will listen on {}:{}",
        server_config.host,
        server_config.port
    );

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        // An empty or missing origin list allows any origin
        let cors = match &cors_config {
            Some(cors_config) if !cors_config.allowed_origins.is_empty() => {
                let mut cors_builder = Cors::default();
                for origin in &cors_config.allowed_origins {
                    cors_builder = cors_builder.allowed_origin(origin);
                }
                cors_builder.allowed_methods(vec!["GET"]).max_age(3600)
            }
            _ => Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET"])
                .max_age(3600),
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(handlers::configure)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
