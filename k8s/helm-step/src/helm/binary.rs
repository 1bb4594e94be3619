use crate::{
    common::{
        constants::DEFAULT_RELEASE_NAME,
        error::{HelmVersion, RegexCompile, Result, SemverParse},
    },
    vec_to_strings,
};
use clap::ValueEnum;
use regex::Regex;
use semver::Version;
use snafu::{ensure, OptionExt, ResultExt};
use std::{fmt, time::Duration};

/// This is the helm executable which the steps run. The helm v2 and helm v3 clients are
/// installed side by side as `helm` and `helm3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum HelmBinary {
    /// The helm v2 client.
    #[default]
    Helm,
    /// The helm v3 client.
    Helm3,
}

impl fmt::Display for HelmBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl HelmBinary {
    /// The name of the executable in $PATH.
    pub(crate) fn command(&self) -> &'static str {
        match self {
            Self::Helm => "helm",
            Self::Helm3 => "helm3",
        }
    }

    /// The major version which `<binary> version` is expected to report.
    pub(crate) fn major_version(&self) -> u64 {
        match self {
            Self::Helm => 2,
            Self::Helm3 => 3,
        }
    }

    /// The arguments for `<binary> version`. Helm v2 also queries Tiller unless it is asked for
    /// the client version only.
    pub(crate) fn version_args(&self) -> Vec<String> {
        match self {
            Self::Helm => vec_to_strings!["version", "--client", "--short"],
            Self::Helm3 => vec_to_strings!["version", "--short"],
        }
    }

    /// Helm v2 needs a client-only `helm init` before it can use repositories.
    pub(crate) fn requires_client_init(&self) -> bool {
        matches!(self, Self::Helm)
    }

    /// The release name to use when none is given. Helm v2 releases are named after the
    /// Namespace they are applied to.
    pub(crate) fn default_release_name(&self, namespace: &str) -> String {
        match self {
            Self::Helm => namespace.to_string(),
            Self::Helm3 => DEFAULT_RELEASE_NAME.to_string(),
        }
    }

    /// Formats the `--timeout` argument. Helm v2 takes seconds, helm v3 takes a duration.
    pub(crate) fn format_timeout(&self, timeout: Duration) -> String {
        match self {
            Self::Helm => timeout.as_secs().to_string(),
            Self::Helm3 => humantime::format_duration(timeout).to_string(),
        }
    }

    /// Parses the output of `<binary> version --short` and validates that it is of the expected
    /// major version.
    pub(crate) fn validate_version(&self, output: &str) -> Result<Version> {
        let expression = r"v([0-9]+\.[0-9]+\.[0-9]+[0-9A-Za-z.+-]*)";
        let regex = Regex::new(expression).context(RegexCompile {
            expression: expression.to_string(),
        })?;

        let version_string = regex
            .captures(output)
            .and_then(|captures| captures.get(1))
            .map(|version| version.as_str())
            .context(HelmVersion {
                version: output.trim().to_string(),
                binary: *self,
            })?;
        let version = Version::parse(version_string).context(SemverParse {
            version_string: version_string.to_string(),
        })?;

        ensure!(
            version.major == self.major_version(),
            HelmVersion {
                version: output.trim().to_string(),
                binary: *self
            }
        );

        Ok(version)
    }
}
