use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single provider call.
///
/// Every provider operation is one outbound GET; the only outcomes are a
/// transport failure, a non-success status, an undecodable body, or a
/// well-formed response with nothing in it.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to send request to {service}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} response contained no data")]
    Empty { service: &'static str },

    /// The geocoder returned zero matches for the requested location.
    #[error("no location matched '{query}'")]
    NotFound { query: String },
}

impl ProviderError {
    pub(crate) fn status(service: &'static str, status: StatusCode, body: &str) -> Self {
        ProviderError::Status {
            service,
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
