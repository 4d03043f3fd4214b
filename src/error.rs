//! error types
//!
//! one error per failure kind: invalid query, invalid connector, url
//! assembly, and transport processing.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for queries, connectors, and the transport
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the query could not be constructed (empty endpoint)
    #[error("query error: {0}")]
    Query(String),

    /// the connector configuration is unusable
    #[error("connector error: {0}")]
    Connector(String),

    /// the query url could not be encoded or assembled
    #[error("failed to encode the query url: {0}")]
    Url(#[from] url::ParseError),

    /// the request itself failed (dns, tcp, tls handshake, body read)
    #[error("processing error: {0}")]
    Processing(String),

    /// a connector config file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// true if the failure happened while talking to the server
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Processing(_))
    }

    /// process exit code used by command line front ends
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Connector(_) => 2,
            Error::Query(_) => 3,
            Error::Url(_) | Error::Processing(_) => 4,
        }
    }

    /// build a processing error from a reqwest failure, keeping its source chain
    pub(crate) fn processing(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Error::Processing(message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
