use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No candidate input image, or no persisted request id to resume from.
    #[error("input not found: {0}")]
    InputNotFound(String),

    #[error("cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image payload: {0}")]
    Encode(#[source] image::ImageError),

    /// An inline data string that is not `data:<mime>;base64,<body>` or does not hold an image.
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    /// The submit endpoint answered with something other than HTTP 200.
    #[error("video submission failed (HTTP {status}): {body}")]
    Submission { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned invalid JSON: {source}")]
    InvalidJson {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing {missing}")]
    MalformedResponse {
        endpoint: &'static str,
        missing: &'static str,
    },

    #[error("request {request_id} still pending after {polls} polls")]
    PollLimitExceeded { request_id: String, polls: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
