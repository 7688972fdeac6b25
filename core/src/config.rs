use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::ConfigError;
use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::ContentFormat;
use kbnav_protocol::ViewOptions;
use kbnav_protocol::search::DEFAULT_MAX_RESULTS;
use kbnav_protocol::view::MAX_VIEW_DEPTH;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";
pub const HOME_ENV: &str = "KBNAV_HOME";
pub const BASE_URL_ENV: &str = "KBNAV_API_BASE_URL";

/// Settings for the navigation engine and the gateway it talks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Absolute base URL of the document service API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on cached node details.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,

    #[serde(default)]
    pub content_format: ContentFormat,

    #[serde(default)]
    pub view: ViewOptions,

    #[serde(default)]
    pub child_filter: ChildFilter,

    #[serde(default)]
    pub child_sort: ChildSort,

    /// Fetch shallow details of history items in the background.
    #[serde(default = "default_true")]
    pub prime_history: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_search_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_true() -> bool {
    true
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            search_max_results: default_search_max_results(),
            content_format: ContentFormat::default(),
            view: ViewOptions::default(),
            child_filter: ChildFilter::default(),
            child_sort: ChildSort::default(),
            prime_history: true,
        }
    }
}

impl NavigatorConfig {
    /// Loads `$KBNAV_HOME/config.toml` (or `~/.kbnav/config.toml`), then
    /// applies environment overrides. A missing file yields defaults.
    pub fn load(home: Option<&Path>) -> Result<Self, ConfigError> {
        let home = match home {
            Some(home) => home.to_path_buf(),
            None => find_kbnav_home()?,
        };
        let mut config = Self::load_from_dir(&home)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV)
            && !base_url.trim().is_empty()
        {
            self.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL: {base_url}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be > 0".to_string()));
        }
        if self.search_max_results == 0 {
            return Err(ConfigError::Invalid(
                "search_max_results must be > 0".to_string(),
            ));
        }
        if self.view.depth > MAX_VIEW_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "view.depth must be <= {MAX_VIEW_DEPTH}"
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `$KBNAV_HOME` when set and non-empty, otherwise `~/.kbnav`.
pub fn find_kbnav_home() -> Result<PathBuf, ConfigError> {
    if let Ok(home) = std::env::var(HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    let mut home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    home.push(".kbnav");
    Ok(home)
}
