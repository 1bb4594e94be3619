use crate::{
    common::error::{HelmUpgradeOptionsAbsent, Result},
    helm::binary::HelmBinary,
    vec_to_strings,
};
use snafu::OptionExt;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// This is a builder for the options of a `helm upgrade`.
#[derive(Default)]
pub(crate) struct HelmUpgradeBuilder {
    release_name: Option<String>,
    namespace: Option<String>,
    chart_dir: Option<PathBuf>,
    install: bool,
    wait_timeout: Option<Duration>,
}

impl HelmUpgradeBuilder {
    /// This is a builder option to add the release name of the helm chart to be upgraded.
    #[must_use]
    pub(crate) fn with_release_name<J>(mut self, name: J) -> Self
    where
        J: ToString,
    {
        self.release_name = Some(name.to_string());
        self
    }

    /// This is a builder option to add the Namespace of the helm chart to be upgraded.
    #[must_use]
    pub(crate) fn with_namespace<J>(mut self, ns: J) -> Self
    where
        J: ToString,
    {
        self.namespace = Some(ns.to_string());
        self
    }

    /// This is a builder option to add the directory of the chart to upgrade to.
    #[must_use]
    pub(crate) fn with_chart_dir<P>(mut self, dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.chart_dir = Some(dir.into());
        self
    }

    /// Install the release if it does not exist yet.
    #[must_use]
    pub(crate) fn with_install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    /// Wait until the release's resources are ready, for at most `timeout`. Waiting is disabled
    /// with None.
    #[must_use]
    pub(crate) fn with_wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Build the HelmUpgrade.
    pub(crate) fn build(self) -> Result<HelmUpgrade> {
        let release_name = self.release_name.context(HelmUpgradeOptionsAbsent {
            option: "release name",
        })?;
        let namespace = self
            .namespace
            .context(HelmUpgradeOptionsAbsent { option: "namespace" })?;
        let chart_dir = self.chart_dir.context(HelmUpgradeOptionsAbsent {
            option: "chart directory",
        })?;

        Ok(HelmUpgrade {
            release_name,
            namespace,
            chart_dir,
            install: self.install,
            wait_timeout: self.wait_timeout,
        })
    }
}

/// These are the options of a `helm upgrade`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HelmUpgrade {
    release_name: String,
    namespace: String,
    chart_dir: PathBuf,
    install: bool,
    wait_timeout: Option<Duration>,
}

impl HelmUpgrade {
    /// This creates an empty builder.
    pub(crate) fn builder() -> HelmUpgradeBuilder {
        HelmUpgradeBuilder::default()
    }

    /// This is a getter for the release name.
    pub(crate) fn release_name(&self) -> &str {
        self.release_name.as_str()
    }

    /// This is a getter for the Namespace.
    pub(crate) fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// This is a getter for the chart directory.
    pub(crate) fn chart_dir(&self) -> &Path {
        self.chart_dir.as_path()
    }

    /// This is a getter for the timeout of `--wait`, if waiting is enabled.
    pub(crate) fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }

    /// The arguments for `<binary> upgrade`.
    pub(crate) fn args(&self, binary: HelmBinary) -> Vec<String> {
        let mut args: Vec<String> =
            vec_to_strings!["upgrade", "--namespace", self.namespace.as_str()];

        if self.install {
            args.push("--install".to_string());
        }
        if let Some(timeout) = self.wait_timeout {
            args.extend(vec_to_strings![
                "--wait",
                "--timeout",
                binary.format_timeout(timeout)
            ]);
        }

        // The positional arguments go last.
        args.extend(vec_to_strings![
            self.release_name.as_str(),
            self.chart_dir.to_string_lossy()
        ]);
        args
    }
}
