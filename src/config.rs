use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Default location of the config file.
pub const DEFAULT_PATH: &str = "./data/config.toml";

static INSTANCE: OnceCell<Config> = OnceCell::new();

/// Loads the config at `path` into the global instance.
///
/// A missing file leaves the defaults in place.
pub fn init(path: impl AsRef<Path>) -> Result<&'static Config, Error> {
    let path = path.as_ref();
    let config = if path.exists() {
        Config::load(path)?
    } else {
        Config::default()
    };

    Ok(INSTANCE.get_or_init(|| config))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reading config failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config failed: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Describing the front-end configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: Api,
    pub session: Session,
    pub cache: Cache,
    /// Directory downloaded authorization files are saved to.
    pub download_dir: String,
    pub log: Log,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Api {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    pub url_prefix: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            url_prefix: "http://localhost:8000".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Session {
    /// Where the access token is persisted between runs.
    pub token_path: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token_path: "./data/token".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Cache {
    /// Values older than this are refetched. Absent means fresh until
    /// invalidated.
    pub max_age_secs: Option<u64>,
}

impl Cache {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_secs.map(Duration::from_secs)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Log {
    /// One of `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: Api::default(),
            session: Session::default(),
            cache: Cache::default(),
            download_dir: "./downloads".to_owned(),
            log: Log::default(),
        }
    }
}
