use std::ffi::OsString;

use celestia_client::CelestiaClient;
use clap::Parser;
use da_config::{CelestiaConfig, FromEnv, OpenAIConfig};
use openai_client::OpenAIClient;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::pipeline::{cancellable, Pipeline, PipelineOutput, Stage};

pub mod cli;
pub mod error;
pub mod pipeline;

pub use error::PipelineError;

/// Parses `args`, resolves configuration from the environment and runs the pipeline once.
///
/// Arguments and the completion credential are checked before any connection is made.
pub async fn run<I, T>(args: I, cancel: &CancellationToken) -> Result<PipelineOutput, PipelineError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;

    let celestia_config = CelestiaConfig::from_env().map_err(PipelineError::Config)?;
    let openai_config = OpenAIConfig::from_env().map_err(PipelineError::Config)?;
    let completion = OpenAIClient::new(&openai_config)?;

    let da = cancellable(cancel, Stage::Init, async {
        CelestiaClient::connect(&cli.node_endpoint, &celestia_config)
            .await
            .map_err(PipelineError::Connection)
    })
    .await?;
    tracing::debug!(?da, ?completion, "clients ready");

    Pipeline::new(&da, &completion, &celestia_config)
        .run(&cli.namespace_hex, &cli.prompt, cancel)
        .await
}
