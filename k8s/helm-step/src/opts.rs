use crate::{
    common::constants::{DEFAULT_RELEASE_CHARTS_URL, HELM_BINARY_ENV, RELEASE_CHARTS_URL_ENV},
    helm::binary::HelmBinary,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use url::Url;

/// These are the supported cli configuration options for the helm steps.
#[derive(Parser)]
#[command(name = "helm-step", version)]
#[command(about = "Pipeline steps which apply helm charts", long_about = None)]
pub(crate) struct CliArgs {
    /// The step to run.
    #[command(subcommand)]
    operation: Operation,

    /// Use ANSI colors for the logs.
    #[arg(long, global = true, default_value_t = true, action = ArgAction::Set)]
    ansi_colors: bool,
}

impl CliArgs {
    /// This returns the step to run.
    pub(crate) fn operation(&self) -> &Operation {
        &self.operation
    }

    /// This returns ansi_colours arg.
    pub(crate) fn ansi_colours(&self) -> bool {
        self.ansi_colors
    }
}

/// The helm steps.
#[derive(Subcommand)]
pub(crate) enum Operation {
    /// Applies the helm chart in a given directory.
    ///
    /// This step is usually used to apply any GitOps promotion changes into a Staging or
    /// Production cluster, e.g. `helm-step apply --dir env --namespace jx-staging`.
    Apply(ApplyArgs),

    /// Loads a directory of charts and loose files, and prints what it holds.
    Pack(PackArgs),
}

/// Options for `apply`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ApplyArgs {
    /// The directory which holds the helm chart.
    #[arg(long, default_value = ".", value_name = "DIR_PATH")]
    dir: PathBuf,

    /// The Kubernetes Namespace to apply the helm chart to. If this is absent or empty, the
    /// $DEPLOY_NAMESPACE environment variable is used.
    #[arg(long)]
    namespace: Option<String>,

    /// The name of the release. Defaults to the Namespace for helm v2, and to 'jx' for helm v3.
    #[arg(long)]
    name: Option<String>,

    /// Wait until the deployed resources report ready.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    wait: bool,

    /// The helm binary to run.
    #[arg(long, env = HELM_BINARY_ENV, value_enum, default_value_t = HelmBinary::default())]
    helm_binary: HelmBinary,

    /// The chart repository which the chart's dependencies are fetched from.
    #[arg(long, env = RELEASE_CHARTS_URL_ENV, default_value = DEFAULT_RELEASE_CHARTS_URL)]
    release_charts_url: Url,
}

impl ApplyArgs {
    /// This returns the helm chart directory.
    pub(crate) fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    /// This returns the Namespace, if one has been given. Empty values are ignored.
    pub(crate) fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// This returns the release name, if one has been given. Empty values are ignored.
    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// This is a predicate to decide if the upgrade should wait for the release to be ready.
    pub(crate) fn wait(&self) -> bool {
        self.wait
    }

    /// This returns the helm binary to run.
    pub(crate) fn helm_binary(&self) -> HelmBinary {
        self.helm_binary
    }

    /// This returns the URL of the release charts repository.
    pub(crate) fn release_charts_url(&self) -> &Url {
        &self.release_charts_url
    }
}

/// Options for `pack`.
#[derive(Args, Debug, Clone)]
pub(crate) struct PackArgs {
    /// The directory which holds the charts and files.
    #[arg(long, default_value = ".", value_name = "DIR_PATH")]
    dir: PathBuf,
}

impl PackArgs {
    /// This returns the pack directory.
    pub(crate) fn dir(&self) -> &Path {
        self.dir.as_path()
    }
}
