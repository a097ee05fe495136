use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub wikipedia: Option<WikipediaConfig>,
    pub cache: Option<CacheConfig>,
    pub feed: Option<FeedConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig::default()),
            cors: None,
            wikipedia: Some(WikipediaConfig::default()),
            cache: Some(CacheConfig::default()),
            feed: Some(FeedConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WikipediaConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org/api/rest_v1/page/html".to_string(),
            user_agent: concat!(
                "discofeed/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/discofeed/discofeed)"
            )
            .to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Entry lifetime, or `None` when `ttl_secs` is zero or does not fit a
    /// `chrono::Duration`.
    pub fn ttl(&self) -> Option<chrono::Duration> {
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .filter(|ttl| *ttl > chrono::Duration::zero())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed conversion service; the page URL is appended to it.
    pub converter_url: String,
    /// Public address of this server, used to build the page URL.
    pub public_url: String,
    pub sections: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            converter_url: "https://granary.io/url?input=mf2-json&output=rss&url=".to_string(),
            public_url: "https://music.jamesg.blog/".to_string(),
            sections: extractors::discography::DEFAULT_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 5000

# [cors]
# allowed_origins = ["http://localhost:3000"]

[wikipedia]
# base_url = "https://en.wikipedia.org/api/rest_v1/page/html"
# user_agent = "discofeed (https://example.com; you@example.com)"
timeout_secs = 15

[cache]
capacity = 100
ttl_secs = 3600

[feed]
# converter_url = "https://granary.io/url?input=mf2-json&output=rss&url="
# public_url = "https://music.jamesg.blog/"
sections = ["albums", "EPs"]
"#;

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path))
            .build()?;

        let config: Self = builder.try_deserialize()?;

        if config.cache().ttl().is_none() {
            return Err(ConfigError::Message(format!(
                "cache.ttl_secs must be between 1 and {}, got {}",
                chrono::Duration::MAX.num_seconds(),
                config.cache().ttl_secs
            )));
        }

        Ok(config)
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn wikipedia(&self) -> WikipediaConfig {
        self.wikipedia.clone().unwrap_or_default()
    }

    pub fn cache(&self) -> CacheConfig {
        self.cache.clone().unwrap_or_default()
    }

    pub fn feed(&self) -> FeedConfig {
        self.feed.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("discofeed").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_loads_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.toml");

        let config = ApiConfig::load_from(&path).unwrap();
        assert!(path.exists());

        assert_eq!(config.server().port, 5000);
        assert!(config.cors.is_none());
        assert_eq!(config.cache().capacity, 100);
        assert_eq!(config.cache().ttl_secs, 3600);
        assert_eq!(config.feed().sections, vec!["albums", "EPs"]);
        assert_eq!(
            config.wikipedia().base_url,
            "https://en.wikipedia.org/api/rest_v1/page/html"
        );
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(
            &path,
            r#"
[wikipedia]
base_url = "http://127.0.0.1:9999"

[cache]
ttl_secs = 60

[cors]
allowed_origins = ["https://reader.example"]
"#,
        )
        .unwrap();

        let config = ApiConfig::load_from(&path).unwrap();

        assert_eq!(config.wikipedia().base_url, "http://127.0.0.1:9999");
        assert_eq!(config.wikipedia().timeout_secs, 15);
        assert_eq!(config.cache().ttl_secs, 60);
        assert_eq!(config.cache().capacity, 100);
        assert_eq!(config.server().host, "127.0.0.1");
        assert_eq!(
            config.feed().converter_url,
            "https://granary.io/url?input=mf2-json&output=rss&url="
        );
        assert_eq!(
            config.cors.unwrap().allowed_origins,
            vec!["https://reader.example"]
        );
    }

    #[test]
    fn test_rejects_unusable_cache_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");

        for ttl_secs in ["0", "9223372036854775807", "-5"] {
            std::fs::write(&path, format!("[cache]\nttl_secs = {ttl_secs}\n")).unwrap();
            assert!(
                ApiConfig::load_from(&path).is_err(),
                "ttl_secs = {ttl_secs} should be rejected"
            );
        }

        std::fs::write(&path, "[cache]\nttl_secs = 86400\n").unwrap();
        let config = ApiConfig::load_from(&path).unwrap();
        assert_eq!(config.cache().ttl(), Some(chrono::Duration::days(1)));
    }
}
