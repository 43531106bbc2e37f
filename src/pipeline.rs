//! The submit → fetch → complete sequence.

use std::future::Future;

use anyhow::anyhow;
use celestia_client::parse_namespace;
use celestia_types::Blob;
use da_client::{
    types::{BlobId, DAError},
    CompletionClient, DataAvailabilityClient,
};
use da_config::CelestiaConfig;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;

/// Progress of a run. A failure at any stage ends the run with a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    NamespaceDecoded,
    BlobSubmitted,
    BlobFetched,
    Completed,
    Done,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub blob_id: BlobId,
    pub fetched: String,
    pub response: String,
}

pub struct Pipeline<'a> {
    da: &'a dyn DataAvailabilityClient,
    completion: &'a dyn CompletionClient,
    config: &'a CelestiaConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        da: &'a dyn DataAvailabilityClient,
        completion: &'a dyn CompletionClient,
        config: &'a CelestiaConfig,
    ) -> Self {
        Self {
            da,
            completion,
            config,
        }
    }

    /// Stores `prompt` under `namespace_hex`, reads it back and asks the completion model about it.
    ///
    /// Nothing is undone on failure: a blob that made it on chain stays there.
    pub async fn run(
        &self,
        namespace_hex: &str,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutput, PipelineError> {
        let mut stage = Stage::Init;
        if cancel.is_cancelled() {
            return Err(PipelineError::Interrupted(stage));
        }

        let namespace = parse_namespace(namespace_hex)?;
        advance(&mut stage, Stage::NamespaceDecoded);

        let payload = prompt.as_bytes().to_vec();
        if let Some(limit) = self.da.blob_size_limit() {
            if payload.len() > limit {
                return Err(PipelineError::Submission(DAError::fatal(anyhow!(
                    "blob of {} bytes exceeds the {limit} byte limit of {}",
                    payload.len(),
                    self.da.client_name()
                ))));
            }
        }

        let blob_id = cancellable(cancel, stage, async {
            self.da
                .dispatch_blob(namespace, payload)
                .await
                .map_err(PipelineError::Submission)
        })
        .await?
        .blob_id;
        advance(&mut stage, Stage::BlobSubmitted);
        tracing::info!("Blob submitted successfully at height: {}!", blob_id.height);
        tracing::info!("Explorer link: {}", self.config.explorer_block_url(blob_id.height));

        let blob = cancellable(cancel, stage, self.fetch(&blob_id)).await?;
        verify_fetched(&blob_id, &blob, prompt.as_bytes())?;
        advance(&mut stage, Stage::BlobFetched);
        let fetched = String::from_utf8_lossy(&blob.data).into_owned();
        tracing::info!("Fetched blob: {fetched}");

        let response = cancellable(cancel, stage, async {
            self.completion
                .complete(&fetched)
                .await
                .map_err(PipelineError::from)
        })
        .await?;
        advance(&mut stage, Stage::Completed);
        tracing::info!("Completion response: {response}");

        advance(&mut stage, Stage::Done);
        Ok(PipelineOutput {
            blob_id,
            fetched,
            response,
        })
    }

    /// Only transient errors are retried, and only up to `max_retries` times (zero by default).
    async fn fetch(&self, blob_id: &BlobId) -> Result<Blob, PipelineError> {
        let mut attempt = 0;
        loop {
            match self.da.get_blob(blob_id).await {
                Ok(blob) => return Ok(blob),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        "retrying blob fetch: {err}"
                    );
                }
                Err(err) => return Err(PipelineError::Fetch(err)),
            }
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = ?stage, to = ?next, "stage transition");
    *stage = next;
}

/// Races `fut` against `cancel`; `stage` is the last stage that completed.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    stage: Stage,
    fut: impl Future<Output = Result<T, PipelineError>>,
) -> Result<T, PipelineError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::Interrupted(stage)),
        result = fut => result,
    }
}

/// The node is trusted to serve what it committed to, but a reorg or a misbehaving node could
/// hand back a different blob for the same coordinates.
fn verify_fetched(blob_id: &BlobId, blob: &Blob, payload: &[u8]) -> Result<(), PipelineError> {
    let field = if blob.commitment != blob_id.commitment {
        "commitment"
    } else if blob.namespace != blob_id.namespace {
        "namespace"
    } else if blob.data != payload {
        "data"
    } else {
        return Ok(());
    };

    Err(PipelineError::BlobMismatch {
        height: blob_id.height,
        field,
    })
}
