use crate::{
    common::error::{
        HelmCommand, HelmDependencyBuildCommand, HelmInitCommand, HelmRepoAddCommand,
        HelmUpgradeCommand, HelmVersionCommand, Result, U8VectorToString,
    },
    helm::{binary::HelmBinary, upgrade::HelmUpgrade},
    vec_to_strings,
};
use async_trait::async_trait;
use semver::Version;
use snafu::{ensure, ResultExt};
use std::{path::Path, process::Output, str};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

/// The helm operations which the steps depend on.
#[async_trait]
pub(crate) trait HelmClient: Send + Sync {
    /// The helm binary which this client runs.
    fn binary(&self) -> HelmBinary;

    /// Runs `<binary> version`, for the client only, and validates the major version.
    async fn version(&self) -> Result<Version>;

    /// Runs `helm init --client-only`.
    async fn init_client_only(&self) -> Result<()>;

    /// Runs `<binary> repo add <name> <url>`.
    async fn add_repo(&self, name: &str, url: &Url) -> Result<()>;

    /// Runs `<binary> dependency build <chart_dir>`.
    async fn dependency_build(&self, chart_dir: &Path) -> Result<()>;

    /// Runs `<binary> upgrade ...`.
    async fn upgrade(&self, upgrade: &HelmUpgrade) -> Result<()>;
}

/// This type executes the helm binary, found in $PATH, as a child process.
#[derive(Clone)]
pub(crate) struct HelmCli {
    binary: HelmBinary,
}

impl HelmCli {
    /// Creates a client which runs `binary`.
    pub(crate) fn new(binary: HelmBinary) -> Self {
        Self { binary }
    }

    /// Spawns the helm binary with `args` and waits for it to exit. The child process is killed
    /// if the returned future is dropped.
    async fn run(&self, args: &[String]) -> Result<Output> {
        let command = self.binary.command();
        debug!(%command, ?args, "Helm command");

        let output = Command::new(command)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .context(HelmCommand {
                command: command.to_string(),
                args: args.to_vec(),
            })?;

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        debug!(stdout=%stdout_str, "Helm command standard output");
        Ok(output)
    }

    fn std_err(output: &Output) -> Result<String> {
        Ok(str::from_utf8(output.stderr.as_slice())
            .context(U8VectorToString)?
            .to_string())
    }
}

#[async_trait]
impl HelmClient for HelmCli {
    fn binary(&self) -> HelmBinary {
        self.binary
    }

    async fn version(&self) -> Result<Version> {
        let args = self.binary.version_args();
        let output = self.run(args.as_slice()).await?;
        ensure!(
            output.status.success(),
            HelmVersionCommand {
                command: self.binary.command(),
                args,
                std_err: Self::std_err(&output)?
            }
        );

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        self.binary.validate_version(stdout_str)
    }

    async fn init_client_only(&self) -> Result<()> {
        let args: Vec<String> = vec_to_strings!["init", "--client-only"];
        let output = self.run(args.as_slice()).await?;
        ensure!(
            output.status.success(),
            HelmInitCommand {
                command: self.binary.command(),
                args,
                std_err: Self::std_err(&output)?
            }
        );
        Ok(())
    }

    async fn add_repo(&self, name: &str, url: &Url) -> Result<()> {
        let args: Vec<String> = vec_to_strings!["repo", "add", name, url];
        let output = self.run(args.as_slice()).await?;
        ensure!(
            output.status.success(),
            HelmRepoAddCommand {
                command: self.binary.command(),
                args,
                std_err: Self::std_err(&output)?
            }
        );
        Ok(())
    }

    async fn dependency_build(&self, chart_dir: &Path) -> Result<()> {
        let args: Vec<String> =
            vec_to_strings!["dependency", "build", chart_dir.to_string_lossy()];
        let output = self.run(args.as_slice()).await?;
        ensure!(
            output.status.success(),
            HelmDependencyBuildCommand {
                command: self.binary.command(),
                args,
                std_err: Self::std_err(&output)?
            }
        );
        Ok(())
    }

    async fn upgrade(&self, upgrade: &HelmUpgrade) -> Result<()> {
        info!(
            release = upgrade.release_name(),
            namespace = upgrade.namespace(),
            chart_dir = %upgrade.chart_dir().display(),
            wait_timeout = ?upgrade.wait_timeout(),
            "Upgrading helm release"
        );
        let args = upgrade.args(self.binary);
        let output = self.run(args.as_slice()).await?;
        ensure!(
            output.status.success(),
            HelmUpgradeCommand {
                command: self.binary.command(),
                args,
                std_err: Self::std_err(&output)?
            }
        );
        Ok(())
    }
}
