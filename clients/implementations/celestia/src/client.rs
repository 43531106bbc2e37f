use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use celestia_rpc::{BlobClient, Client};
use celestia_types::{nmt::Namespace, Blob, TxConfig};
use da_client::{
    types::{BlobId, DAError, DispatchResponse},
    DataAvailabilityClient,
};
use da_config::CelestiaConfig;

/// Largest blob payload a Celestia node accepts.
pub const BLOB_SIZE_LIMIT: usize = 1973786;

/// Client for a Celestia light or bridge node's JSON-RPC API.
#[derive(Clone)]
pub struct CelestiaClient {
    light_node_url: String,
    client: Arc<Client>,
}

impl CelestiaClient {
    /// Opens the RPC connection. The handle is closed when the last clone is dropped.
    pub async fn connect(light_node_url: &str, config: &CelestiaConfig) -> anyhow::Result<Self> {
        let client = Client::new(light_node_url, config.auth_token.as_deref())
            .await
            .with_context(|| format!("could not create client for {light_node_url}"))?;

        Ok(Self {
            light_node_url: light_node_url.to_string(),
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl DataAvailabilityClient for CelestiaClient {
    async fn dispatch_blob(
        &self,
        namespace: Namespace,
        data: Vec<u8>,
    ) -> Result<DispatchResponse, DAError> {
        let blob = Blob::new(namespace, data)
            .context("failed to create blob")
            .map_err(DAError::fatal)?;
        let commitment = blob.commitment;

        // Default config lets the node pick the gas price.
        let height = self
            .client
            .blob_submit(&[blob], TxConfig::default())
            .await
            .context("blob submission rejected")
            .map_err(DAError::fatal)?;
        tracing::debug!(height, "blob included");

        Ok(DispatchResponse {
            blob_id: BlobId {
                height,
                namespace,
                commitment,
            },
        })
    }

    async fn get_blob(&self, blob_id: &BlobId) -> Result<Blob, DAError> {
        // A node can briefly lag behind the height it just reported, so this is worth retrying.
        self.client
            .blob_get(blob_id.height, blob_id.namespace, blob_id.commitment)
            .await
            .with_context(|| format!("blob not served at height {}", blob_id.height))
            .map_err(DAError::transient)
    }

    fn client_name(&self) -> String {
        "celestia".to_string()
    }

    fn blob_size_limit(&self) -> Option<usize> {
        Some(BLOB_SIZE_LIMIT)
    }
}

impl Debug for CelestiaClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CelestiaClient")
            .field("light_node_url", &self.light_node_url)
            .finish()
    }
}
