use snafu::Snafu;
use std::path::PathBuf;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a path cannot be made absolute.
    #[snafu(display("Failed to resolve absolute path for {}: {}", path.display(), source))]
    PathResolution {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the contents of a directory cannot be listed.
    #[snafu(display("Error reading {}: {}", path.display(), source))]
    ReadingDirectoryContents {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when an entry of a directory listing cannot be read.
    #[snafu(display("Failed to collect entries from directory {}: {}", path.display(), source))]
    CollectDirEntries {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the file type of a directory entry cannot be determined.
    #[snafu(display("Failed to get file type of {}: {}", path.display(), source))]
    ReadingFileType {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error when opening a file.
    #[snafu(display("Failed to open file {}: {}", filepath.display(), source))]
    OpeningFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error when reading a file.
    #[snafu(display("Failed to read file {}: {}", filepath.display(), source))]
    ReadingFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when a file name is not valid UTF-8, and so it cannot be used as a key.
    #[snafu(display("File name of {} is not valid UTF-8", path.display()))]
    NonUtf8FileName { path: PathBuf },

    /// Error for when a chart directory does not carry a Chart.yaml file.
    #[snafu(display("Chart.yaml file not found in chart directory {}", path.display()))]
    ChartYamlAbsent { path: PathBuf },

    /// Error for when yaml could not be parsed from a file (Reader).
    #[snafu(display("Failed to parse YAML at {}: {}", filepath.display(), source))]
    YamlParseFromFile {
        source: serde_yaml::Error,
        filepath: PathBuf,
    },

    /// Error for when the Chart.yaml of a chart has an empty name.
    #[snafu(display("Chart.yaml at {} has an empty 'name'", path.display()))]
    EmptyChartName { path: PathBuf },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
