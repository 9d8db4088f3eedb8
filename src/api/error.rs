use thiserror::Error;

/// Errors that can occur talking to the conversation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, timeout.
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status without a GraphQL error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The server answered with GraphQL `errors`.
    #[error("{0}")]
    GraphQl(String),
    /// Body was not the JSON shape we expected.
    #[error("could not decode response: {0}")]
    Decode(String),
    /// Neither `data` nor `errors` came back.
    #[error("server returned no data")]
    EmptyResponse,
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
