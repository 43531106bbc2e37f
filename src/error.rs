use celestia_client::NamespaceError;
use da_client::types::{CompletionError, DAError};

use crate::pipeline::Stage;

/// Every way a run can end early. Each variant names the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Argument(#[from] clap::Error),
    #[error("failed to load configuration: {0:#}")]
    Config(anyhow::Error),
    #[error("failed to decode namespace: {0}")]
    Namespace(#[from] NamespaceError),
    #[error("failed to create client: {0:#}")]
    Connection(anyhow::Error),
    #[error("failed to submit blob: {0}")]
    Submission(DAError),
    #[error("failed to fetch blob: {0}")]
    Fetch(DAError),
    #[error("fetched blob at height {height} does not match the submitted one: {field} differs")]
    BlobMismatch { height: u64, field: &'static str },
    #[error("OPENAI_KEY environment variable not set")]
    MissingCredential,
    #[error("failed to get completion: {0}")]
    Completion(CompletionError),
    #[error("interrupted after stage {0:?}")]
    Interrupted(Stage),
}

impl From<CompletionError> for PipelineError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingCredential => Self::MissingCredential,
            other => Self::Completion(other),
        }
    }
}

impl PipelineError {
    /// Process exit status, following the `sysexits.h` conventions where one fits.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Argument(_) => 2,
            Self::Namespace(_) => 65,
            Self::Connection(_) => 69,
            Self::Submission(_) => 70,
            Self::Fetch(_) | Self::BlobMismatch { .. } => 71,
            Self::Completion(_) => 75,
            Self::MissingCredential => 77,
            Self::Config(_) => 78,
            Self::Interrupted(_) => 130,
        }
    }
}
