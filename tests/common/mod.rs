use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use celestia_types::{nmt::Namespace, Blob};
use da_client::{
    types::{BlobId, CompletionError, DAError, DispatchResponse},
    CompletionClient, DataAvailabilityClient,
};

/// Stores blobs in memory and hands out increasing heights starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryDa {
    pub blobs: Mutex<Vec<(BlobId, Blob)>>,
    pub submissions: AtomicUsize,
    pub fetches: AtomicUsize,
    /// Number of upcoming fetches that fail with a transient error.
    pub flaky_fetches: AtomicUsize,
    pub reject_submissions: bool,
    /// Serve this payload instead of the stored one.
    pub tampered_payload: Option<Vec<u8>>,
    pub size_limit: Option<usize>,
}

#[async_trait]
impl DataAvailabilityClient for InMemoryDa {
    async fn dispatch_blob(
        &self,
        namespace: Namespace,
        data: Vec<u8>,
    ) -> Result<DispatchResponse, DAError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if self.reject_submissions {
            return Err(DAError::fatal(anyhow!("insufficient fee")));
        }
        let blob = Blob::new(namespace, data).map_err(DAError::fatal)?;
        let mut blobs = self.blobs.lock().unwrap();
        let blob_id = BlobId {
            height: blobs.len() as u64 + 1,
            namespace,
            commitment: blob.commitment,
        };
        blobs.push((blob_id, blob));
        Ok(DispatchResponse { blob_id })
    }

    async fn get_blob(&self, blob_id: &BlobId) -> Result<Blob, DAError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let flaky = self
            .flaky_fetches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if flaky {
            return Err(DAError::transient(anyhow!("header: not yet synced")));
        }

        let blobs = self.blobs.lock().unwrap();
        let (_, blob) = blobs
            .iter()
            .find(|(id, _)| id == blob_id)
            .ok_or_else(|| DAError::fatal(anyhow!("blob: not found")))?;
        match &self.tampered_payload {
            Some(payload) => Blob::new(blob.namespace, payload.clone()).map_err(DAError::fatal),
            None => Ok(blob.clone()),
        }
    }

    fn client_name(&self) -> String {
        "in-memory".to_string()
    }

    fn blob_size_limit(&self) -> Option<usize> {
        self.size_limit
    }
}

/// Answers every prompt with a fixed reply and remembers what it was asked.
#[derive(Debug, Default)]
pub struct EchoCompletion {
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl CompletionClient for EchoCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(CompletionError::Api {
                status: 429,
                message: "Rate limit reached".to_string(),
            });
        }
        Ok(format!("reply to {prompt}"))
    }
}
