use clap::Parser;

/// Store a prompt on Celestia, read it back and ask a completion model about it.
///
/// Requires OPENAI_KEY in the environment (a `.env` file is read when present).
#[derive(Debug, Parser)]
#[command(name = "celestia-gpt", version)]
pub struct Cli {
    /// Celestia node RPC endpoint, e.g. http://localhost:26658
    pub node_endpoint: String,

    /// Namespace id as 20 hex characters (10 bytes), e.g. 0102030405060708090a
    pub namespace_hex: String,

    /// Text to submit as the blob and forward to the completion model
    #[arg(allow_hyphen_values = true)]
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn three_positionals() {
        let cli = Cli::try_parse_from([
            "celestia-gpt",
            "http://localhost:26658",
            "0102030405060708090a",
            "hello world",
        ])
        .unwrap();
        assert_eq!(cli.node_endpoint, "http://localhost:26658");
        assert_eq!(cli.namespace_hex, "0102030405060708090a");
        assert_eq!(cli.prompt, "hello world");
    }

    #[test]
    fn prompt_may_start_with_a_dash() {
        let args = ["celestia-gpt", "http://node", "0102030405060708090a", "-5 reasons"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.prompt, "-5 reasons");
    }

    #[test]
    fn too_few_arguments() {
        let err = Cli::try_parse_from(["celestia-gpt", "http://localhost:26658"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn too_many_arguments() {
        let err = Cli::try_parse_from(["celestia-gpt", "a", "b", "c", "d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
