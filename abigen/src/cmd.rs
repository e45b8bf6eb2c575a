use abigen_tracing::{TracingSubscriberOptions, TracingWriterMode};
use abigen_types::NetworkId;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Generate TypeScript bindings for compiled Ralph contracts and scripts.
#[derive(Debug, Default, Parser)]
#[clap(name = "abigen", version)]
pub struct Command {
    /// Path to the project. If not specified, the current working directory is used.
    ///
    /// An `abigen.toml` in this directory supplies defaults for the other options.
    #[clap(short, long, env = "ABIGEN_PROJECT_DIR")]
    pub path: Option<PathBuf>,
    /// Directory holding `.project.json` and the compiled `*.ral.json` artifacts.
    ///
    /// Bindings are written to its `ts` subdirectory. Defaults to `artifacts`.
    #[clap(long, env = "ABIGEN_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,
    /// Directory holding the `.deployments.<network>.json` manifests.
    ///
    /// When given, the deployments unit is generated even if no manifest exists yet.
    #[clap(long, env = "ABIGEN_DEPLOYMENT_DIR")]
    pub deployment_dir: Option<PathBuf>,
    /// Networks whose manifests are merged, in order.
    ///
    /// Possible values are: [mainnet, testnet, devnet]
    #[clap(long, value_delimiter = ',')]
    pub networks: Vec<NetworkId>,
    /// Use verbose output. Pass twice for trace output.
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Silence all output.
    #[clap(short, long)]
    pub silent: bool,
    /// Set the log level, overriding `--verbose` and `RUST_LOG`.
    #[clap(long)]
    pub log_level: Option<LevelFilter>,
}

impl Command {
    pub fn tracing_options(&self) -> TracingSubscriberOptions {
        TracingSubscriberOptions {
            verbosity: Some(self.verbose),
            silent: Some(self.silent),
            log_level: self.log_level,
            writer_mode: Some(TracingWriterMode::Stdio),
        }
    }
}
