use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("cannot decode response of {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
