use miette::Diagnostic;
use reqwest::StatusCode;

/// A timestamp (or the payload carrying it) could not be turned into a date.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum FormatError {
    #[error("invalid timestamp: {value:?}")]
    #[diagnostic(
        code(rainview::invalid_timestamp),
        help("expected a JSON object like {{\"timestamp\": \"2024-03-01T00:00:00Z\"}}")
    )]
    InvalidTimestamp { value: String },
}

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("error response code {status}")]
    #[diagnostic(code(rainview::http))]
    Http { status: StatusCode },

    #[error("request timed out after {0}")]
    #[diagnostic(code(rainview::timeout))]
    Timeout(humantime::Duration),

    #[error("failed to send GET")]
    #[diagnostic(code(rainview::network))]
    Network(#[source] reqwest::Error),

    #[error("invalid base URL {url:?}: {reason}")]
    #[diagnostic(
        code(rainview::config),
        help("base_url must be an absolute http(s) URL without a query, eg http://localhost:8080")
    )]
    BaseUrl { url: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),
}
