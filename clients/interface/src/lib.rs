use std::fmt;

use async_trait::async_trait;
use celestia_types::{nmt::Namespace, Blob};

use crate::types::{BlobId, CompletionError, DAError, DispatchResponse};

pub mod types;

/// A data availability layer that stores namespaced blobs and serves them back.
#[async_trait]
pub trait DataAvailabilityClient: Sync + Send + fmt::Debug {
    /// Submits `data` under `namespace` and waits until the blob is included.
    async fn dispatch_blob(
        &self,
        namespace: Namespace,
        data: Vec<u8>,
    ) -> Result<DispatchResponse, DAError>;

    /// Reads back the blob stored at the given coordinates.
    async fn get_blob(&self, blob_id: &BlobId) -> Result<Blob, DAError>;

    fn client_name(&self) -> String;

    /// Largest payload the layer accepts in one blob, if it has a limit.
    fn blob_size_limit(&self) -> Option<usize>;
}

/// A hosted text-completion model.
#[async_trait]
pub trait CompletionClient: Sync + Send + fmt::Debug {
    /// Sends `prompt` as the single user message and returns the first generated choice.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
