use bytes::Bytes;
use thiserror::Error;

/// Boxed error produced by an [`crate::HttpExecutor`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong while querying the weather service.
///
/// None of these are retried by the client. Variants produced after the body
/// was read keep the raw body so the caller can diagnose without re-issuing
/// the request.
#[derive(Debug, Error)]
pub enum CaiyunError {
    /// Connection, DNS, TLS or any other transport failure.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The body is not a JSON document carrying a `status` field.
    #[error("unexpected response: {source}\nraw response: {}", String::from_utf8_lossy(.body))]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        body: Bytes,
    },

    /// The service answered, but `status` is not `"ok"`.
    #[error("unknown status '{status}': {}", String::from_utf8_lossy(.body))]
    RemoteStatus { status: String, body: Bytes },

    /// The envelope was fine but the payload does not fit the reply schema.
    #[error("unexpected response: {source}\nraw response: {}", String::from_utf8_lossy(.body))]
    SchemaMismatch {
        #[source]
        source: serde_json::Error,
        body: Bytes,
    },
}

impl CaiyunError {
    /// Raw response body, when the error happened after it was read.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            CaiyunError::Transport(_) => None,
            CaiyunError::MalformedResponse { body, .. }
            | CaiyunError::RemoteStatus { body, .. }
            | CaiyunError::SchemaMismatch { body, .. } => Some(body),
        }
    }

    /// Raw response body as (lossy) text.
    pub fn body_text(&self) -> Option<String> {
        self.body()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}
