use std::{error, fmt};

use celestia_types::{nmt::Namespace, Commitment};

/// Coordinates of a blob that the DA layer has included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobId {
    pub height: u64,
    pub namespace: Namespace,
    pub commitment: Commitment,
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "height {} namespace 0x{}",
            self.height,
            hex::encode(self.namespace.as_bytes())
        )
    }
}

/// DispatchResponse is the response received from the DA layer after dispatching a blob.
#[derive(Debug, Clone)]
pub struct DispatchResponse {
    /// The blob_id is needed to fetch the blob back.
    pub blob_id: BlobId,
}

/// Error returned by a [`crate::DataAvailabilityClient`].
#[derive(Debug)]
pub struct DAError {
    pub error: anyhow::Error,
    /// Whether repeating the same call may succeed.
    pub is_transient: bool,
}

impl DAError {
    pub fn fatal(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            is_transient: false,
        }
    }

    pub fn transient(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            is_transient: true,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.is_transient
    }
}

impl fmt::Display for DAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_transient { "transient" } else { "fatal" };
        write!(f, "{kind} data availability client error: {:#}", self.error)
    }
}

impl error::Error for DAError {}

/// Error returned by a [`crate::CompletionClient`].
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// No credential was configured, so no request was sent.
    #[error("OPENAI_KEY environment variable not set")]
    MissingCredential,
    #[error("completion request failed: {0:#}")]
    Request(anyhow::Error),
    #[error("completion service answered {status}: {message}")]
    Api { status: u16, message: String },
    #[error("completion response could not be decoded: {0:#}")]
    Decode(anyhow::Error),
    #[error("completion response contained no choices")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestia_types::Blob;

    fn sample_blob_id() -> BlobId {
        let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap();
        let blob = Blob::new(namespace, b"hello world".to_vec()).unwrap();
        BlobId {
            height: 1234,
            namespace,
            commitment: blob.commitment,
        }
    }

    #[test]
    fn blob_id_display_shows_height_and_namespace() {
        let rendered = sample_blob_id().to_string();
        assert!(rendered.starts_with("height 1234 namespace 0x00"));
        assert!(rendered.ends_with("0102030405060708090a"));
    }

    #[test]
    fn da_error_display_names_kind() {
        let fatal = DAError::fatal(anyhow::anyhow!("insufficient fee"));
        assert!(!fatal.is_transient());
        assert_eq!(
            fatal.to_string(),
            "fatal data availability client error: insufficient fee"
        );

        let transient = DAError::transient(anyhow::anyhow!("blob: not found"));
        assert!(transient.is_transient());
        assert!(transient.to_string().starts_with("transient"));
    }
}
