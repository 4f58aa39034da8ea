use log::LevelFilter;
use miette::*;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the rain API, eg `http://raincloud.local:8080`.
    pub base_url: String,
    /// Upper bound on a single request, including reading the body.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Shown until the first rain event is loaded.
    pub placeholder: String,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(10),
            placeholder: "no rain recorded".to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s)
            .into_diagnostic()
            .wrap_err("failed to deserialize config from TOML")
    }

    /// Reads the config at `path`, or writes out and returns the default if there is none.
    pub async fn read_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let s = tokio::fs::read_to_string(path)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            Self::from_toml(&s).wrap_err_with(|| format!("bad config in {}", path.display()))
        } else {
            let cfg = Self::default();
            let toml = toml::to_string_pretty(&cfg)
                .into_diagnostic()
                .wrap_err("failed to serialize default config")?;
            tokio::fs::write(path, toml)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write config to {}", path.display()))?;
            Ok(cfg)
        }
    }
}
