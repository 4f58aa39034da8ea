use crate::{
    data::RainEvent,
    error::{Error, FormatError},
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client,
};
use std::time::Duration;

/// A reqwest client with a bounded per-request timeout.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client, timeout })
    }

    /// Fetch the most recent rain event from a `lastRain` endpoint.
    pub async fn last_rain(&self, url: &str) -> Result<RainEvent, Error> {
        let body = self
            .string(
                url,
                [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            )
            .await?;
        parse_rain_event(&body).map_err(Error::from)
    }

    pub async fn string<H>(&self, url: &str, hdrs: H) -> Result<String, Error>
    where
        H: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        let headers: HeaderMap = hdrs.into_iter().collect();

        let resp = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http { status });
        }

        resp.text().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout.into())
        } else {
            Error::Network(e)
        }
    }
}

/// Longest stretch of a rejected body carried in the error.
const BODY_IN_ERROR: usize = 200;

/// A body that is not JSON, or has no string `timestamp`, is an invalid timestamp.
pub fn parse_rain_event(body: &str) -> Result<RainEvent, FormatError> {
    serde_json::from_str(body).map_err(|e| {
        log::debug!("rain event body rejected: {e}");
        FormatError::InvalidTimestamp {
            value: body.chars().take(BODY_IN_ERROR).collect(),
        }
    })
}
