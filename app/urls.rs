use crate::error::Error;
use reqwest::Url;

pub const LAST_RAIN: &str = "lastRain";

/// The rain API's endpoints, rooted at a configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// `base_url` must be an absolute `http` or `https` URL; it may carry a path prefix.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let bad = |reason: &str| Error::BaseUrl {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(base_url.trim()).map_err(|e| bad(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(bad("scheme must be http or https"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(bad("query strings and fragments are not supported"));
        }

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn last_rain(&self) -> String {
        format!("{}/{LAST_RAIN}", self.base)
    }
}
