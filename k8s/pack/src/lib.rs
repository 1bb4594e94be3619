/// Contains the helm chart types and the tools to load a chart from an unpacked directory.
pub mod chart;
/// Contains the error handling tooling.
pub mod error;
/// Contains the pack type and the directory loader which builds it.
pub mod load;

pub use chart::{Chart, ChartDirLoader, ChartFile, ChartLoader, ChartMetadata};
pub use error::{Error, Result};
pub use load::{from_dir, Pack, PackLoader};
