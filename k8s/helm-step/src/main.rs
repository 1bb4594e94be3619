use crate::{
    apply::apply,
    common::error::{Interrupted, Result, SignalListener},
    helm::client::HelmCli,
    inspect::inspect,
    opts::{CliArgs, Operation},
};
use clap::Parser;
use snafu::ResultExt;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod apply;
mod common;
mod helm;
mod inspect;
mod opts;

#[tokio::main]
async fn main() {
    let opts = CliArgs::parse();
    init_logging(&opts);

    if let Err(error) = run(&opts).await {
        error!(%error, "Failed to run helm step");
        std::process::exit(1);
    }
}

/// Initialize logging components -- tracing.
fn init_logging(opts: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(opts.ansi_colours())
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the step, unless it is interrupted first. Interrupting a step kills its helm child
/// process.
async fn run(opts: &CliArgs) -> Result<()> {
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context(SignalListener)?;
            Interrupted { signal: "SIGINT" }.fail()
        },
        done = opts.operation().execute() => {
            done
        }
    }
}

impl Operation {
    async fn execute(&self) -> Result<()> {
        match self {
            Operation::Apply(args) => {
                let helm = HelmCli::new(args.helm_binary());
                apply(&helm, args).await
            }
            Operation::Pack(args) => inspect(args),
        }
    }
}
