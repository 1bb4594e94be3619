use crate::{common::constants::DEPLOY_NAMESPACE_ENV, helm::binary::HelmBinary};
use snafu::Snafu;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub(crate) enum Error {
    /// Error for when a Helm command fails.
    #[snafu(display(
        "Failed to run Helm command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    HelmCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when regular expression parsing or compilation fails.
    #[snafu(display("Failed to compile regex {}: {}", expression, source))]
    RegexCompile {
        source: regex::Error,
        expression: String,
    },

    /// Error for when the version of the helm binary does not match the selected binary.
    #[snafu(display(
        "Helm version '{}' of binary '{}' does not start with 'v{}.x.y'",
        version,
        binary,
        binary.major_version()
    ))]
    HelmVersion { version: String, binary: HelmBinary },

    /// Error for failures in generating semver::Version from a &str input.
    #[snafu(display("Failed to parse {} as a valid semver: {}", version_string, source))]
    SemverParse {
        source: semver::Error,
        version_string: String,
    },

    /// Error for use when converting Vec<> to String.
    #[snafu(display("Failed to convert Vec<u8> to UTF-8 formatted String: {}", source))]
    U8VectorToString { source: std::str::Utf8Error },

    /// Error for when a Helm version command execution succeeds, but with an error.
    #[snafu(display(
        "`helm version` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmVersionCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a Helm init command execution succeeds, but with an error.
    #[snafu(display(
        "`helm init` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmInitCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a Helm repo add command execution succeeds, but with an error.
    #[snafu(display(
        "`helm repo add` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmRepoAddCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a Helm dependency build command execution succeeds, but with an error.
    #[snafu(display(
        "`helm dependency build` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmDependencyBuildCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when a Helm upgrade command execution succeeds, but with an error.
    #[snafu(display(
        "`helm upgrade` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmUpgradeCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for mandatory options for a HelmUpgrade are missing when building.
    #[snafu(display("Mandatory options for HelmUpgrade were not given: {}", option))]
    HelmUpgradeOptionsAbsent { option: String },

    /// Error for when neither the --namespace option nor the fallback environment variable is
    /// set.
    #[snafu(display(
        "No --namespace option specified or ${} environment variable available",
        DEPLOY_NAMESPACE_ENV
    ))]
    NoNamespace,

    /// Error for when a chart or a pack could not be loaded from a directory.
    #[snafu(display("{}", source))]
    LoadPack { source: pack::Error },

    /// Error for when the command is interrupted by a signal.
    #[snafu(display("Interrupted by {}", signal))]
    Interrupted { signal: String },

    /// Error for when the signal handler could not be installed.
    #[snafu(display("Failed to listen for shutdown signal: {}", source))]
    SignalListener { source: std::io::Error },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
