use crate::{
    error::{
        ChartYamlAbsent, EmptyChartName, ReadingFile, ReadingFileType, Result, YamlParseFromFile,
    },
    load::read_dir_sorted,
};
use semver::Version;
use serde::{de, Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use snafu::{ensure, ResultExt};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// This is the name of the file which carries a chart's metadata.
pub const CHART_YAML: &str = "Chart.yaml";

/// This is the name of the file which carries a chart's default values.
pub const VALUES_YAML: &str = "values.yaml";

/// This is the directory which holds a chart's templates.
pub const TEMPLATES_DIR: &str = "templates";

/// This is the directory which holds a chart's sub-charts.
pub const CHARTS_DIR: &str = "charts";

/// This struct is used to deserialize helm charts' Chart.yaml file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    #[serde(default)]
    api_version: Option<String>,
    /// This is the name of the helm chart.
    name: String,
    /// This is the version of the helm chart, as written. Helm accepts versions which are not
    /// strict semver, e.g. with a leading 'v'.
    #[serde(deserialize_with = "scalar_to_string")]
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_to_string")]
    app_version: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

impl ChartMetadata {
    /// Creates metadata with only the mandatory fields set.
    pub fn new<N, V>(name: N, version: V) -> Self
    where
        N: ToString,
        V: ToString,
    {
        Self {
            api_version: None,
            name: name.to_string(),
            version: version.to_string(),
            description: None,
            app_version: None,
            keywords: Vec::new(),
        }
    }

    /// This is a getter for the helm chart name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// This is a getter for the helm chart version.
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Parses the helm chart version as semver, ignoring a leading 'v'. This is None if the
    /// version is not valid semver.
    pub fn semver(&self) -> Option<Version> {
        let version = self.version.strip_prefix('v').unwrap_or(self.version.as_str());
        Version::parse(version).ok()
    }

    /// This is a getter for the Chart.yaml apiVersion, e.g. v1 or v2.
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// This is a getter for the helm chart description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// This is a getter for the version of the application packaged by the chart.
    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }

    /// This is a getter for the helm chart keywords.
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_slice()
    }
}

/// Chart.yaml scalars like `version: 1.0` are read as numbers by YAML, but they are strings to
/// helm.
fn scalar_to_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        value => Err(de::Error::custom(format!(
            "expected a string or a number, found {value:?}"
        ))),
    }
}

fn optional_scalar_to_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(value) => Ok(Some(value)),
        Value::Number(value) => Ok(Some(value.to_string())),
        value => Err(de::Error::custom(format!(
            "expected a string or a number, found {value:?}"
        ))),
    }
}

/// A file which belongs to a chart, with its path relative to the chart's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    name: PathBuf,
    data: Vec<u8>,
}

impl ChartFile {
    /// Creates a chart file from its relative path and contents.
    pub fn new<P>(name: P, data: Vec<u8>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The path of the file, relative to the chart's root directory.
    pub fn name(&self) -> &Path {
        self.name.as_path()
    }

    /// The contents of the file.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }
}

/// An in-memory helm chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    metadata: ChartMetadata,
    values: Value,
    templates: Vec<ChartFile>,
    files: Vec<ChartFile>,
    dependencies: Vec<Chart>,
}

impl From<ChartMetadata> for Chart {
    fn from(metadata: ChartMetadata) -> Self {
        Self {
            metadata,
            values: Value::Mapping(Mapping::new()),
            templates: Vec::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

impl Chart {
    /// This is a getter for the chart's Chart.yaml contents.
    pub fn metadata(&self) -> &ChartMetadata {
        &self.metadata
    }

    /// This is a getter for the chart's default values. This is an empty mapping if the chart
    /// has no values.yaml.
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// This is a getter for the files in the templates directory.
    pub fn templates(&self) -> &[ChartFile] {
        self.templates.as_slice()
    }

    /// This is a getter for every other file in the chart, e.g. README.md, crds/*.yaml, or
    /// packaged sub-charts.
    pub fn files(&self) -> &[ChartFile] {
        self.files.as_slice()
    }

    /// This is a getter for the unpacked sub-charts in the charts directory.
    pub fn dependencies(&self) -> &[Chart] {
        self.dependencies.as_slice()
    }
}

/// Loads a structured chart out of a directory.
pub trait ChartLoader {
    /// Load the chart rooted at `path`.
    fn load_chart(&self, path: &Path) -> Result<Chart>;
}

impl<F> ChartLoader for F
where
    F: Fn(&Path) -> Result<Chart>,
{
    fn load_chart(&self, path: &Path) -> Result<Chart> {
        self(path)
    }
}

/// Loads an unpacked chart directory, i.e. one with a Chart.yaml at its root.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartDirLoader;

impl ChartLoader for ChartDirLoader {
    fn load_chart(&self, path: &Path) -> Result<Chart> {
        let chart_yaml_path = path.join(CHART_YAML);
        ensure!(
            chart_yaml_path.is_file(),
            ChartYamlAbsent {
                path: path.to_path_buf()
            }
        );

        let chart_yaml = fs::read(chart_yaml_path.as_path()).context(ReadingFile {
            filepath: chart_yaml_path.clone(),
        })?;
        let metadata: ChartMetadata =
            serde_yaml::from_slice(chart_yaml.as_slice()).context(YamlParseFromFile {
                filepath: chart_yaml_path.clone(),
            })?;
        ensure!(
            !metadata.name.is_empty(),
            EmptyChartName {
                path: chart_yaml_path
            }
        );

        let mut chart = Chart::from(metadata);
        self.walk(path, path, &mut chart)?;

        debug!(
            name = chart.metadata.name(),
            version = %chart.metadata.version(),
            path = %path.display(),
            "Loaded helm chart"
        );
        Ok(chart)
    }
}

impl ChartDirLoader {
    /// Walk through `dir`, sorting each file under `root` into the chart.
    fn walk(&self, root: &Path, dir: &Path, chart: &mut Chart) -> Result<()> {
        let in_charts_dir = dir.strip_prefix(root).is_ok_and(|d| d == Path::new(CHARTS_DIR));

        for entry in read_dir_sorted(dir)? {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .context(ReadingFileType { path: path.clone() })?;

            if file_type.is_dir() {
                if in_charts_dir {
                    chart.dependencies.push(self.load_chart(path.as_path())?);
                } else {
                    self.walk(root, path.as_path(), chart)?;
                }
                continue;
            }

            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => path.clone(),
            };
            if relative == Path::new(CHART_YAML) {
                continue;
            }

            let data = fs::read(path.as_path()).context(ReadingFile {
                filepath: path.clone(),
            })?;

            if relative == Path::new(VALUES_YAML) {
                chart.values = parse_values(data.as_slice(), path)?;
            } else if relative.starts_with(TEMPLATES_DIR) {
                chart.templates.push(ChartFile::new(relative, data));
            } else {
                chart.files.push(ChartFile::new(relative, data));
            }
        }

        Ok(())
    }
}

/// Parse a values.yaml file. An empty file yields an empty mapping.
fn parse_values(buf: &[u8], filepath: PathBuf) -> Result<Value> {
    let values: Value = serde_yaml::from_slice(buf).context(YamlParseFromFile { filepath })?;
    Ok(match values {
        Value::Null => Value::Mapping(Mapping::new()),
        values => values,
    })
}

#[cfg(test)]
mod tests {
    use super::{Chart, ChartDirLoader, ChartLoader, ChartMetadata};
    use crate::error::Error;
    use semver::Version;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_chart_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "Chart.yaml",
            "apiVersion: v2\nname: env\nversion: 0.0.1\ndescription: staging\nappVersion: \"1.2\"\n",
        );
        write(root, "values.yaml", "replicaCount: 2\n");
        write(root, "README.md", "# env\n");
        write(root, "templates/deployment.yaml", "kind: Deployment\n");
        write(root, "templates/tests/test-connection.yaml", "kind: Pod\n");
        write(root, "charts/sub/Chart.yaml", "name: sub\nversion: 1.0.0\n");
        write(root, "charts/sub/templates/svc.yaml", "kind: Service\n");
        write(root, "charts/packaged-1.0.0.tgz", "not really gzip");

        let chart = ChartDirLoader.load_chart(root).unwrap();

        assert_eq!(chart.metadata().name(), "env");
        assert_eq!(chart.metadata().version(), "0.0.1");
        assert_eq!(chart.metadata().semver(), Some(Version::new(0, 0, 1)));
        assert_eq!(chart.metadata().api_version(), Some("v2"));
        assert_eq!(chart.metadata().app_version(), Some("1.2"));
        assert_eq!(chart.values()["replicaCount"].as_u64(), Some(2));

        let templates: Vec<&Path> = chart.templates().iter().map(|t| t.name()).collect();
        assert_eq!(
            templates,
            vec![
                Path::new("templates/deployment.yaml"),
                Path::new("templates/tests/test-connection.yaml")
            ]
        );

        let files: Vec<&Path> = chart.files().iter().map(|f| f.name()).collect();
        assert_eq!(
            files,
            vec![
                Path::new("README.md"),
                Path::new("charts/packaged-1.0.0.tgz")
            ]
        );
        assert_eq!(chart.files()[0].data(), b"# env\n");

        assert_eq!(chart.dependencies().len(), 1);
        let sub = &chart.dependencies()[0];
        assert_eq!(sub.metadata().name(), "sub");
        assert_eq!(sub.templates().len(), 1);
        assert_eq!(sub.templates()[0].name(), Path::new("templates/svc.yaml"));
    }

    #[test]
    fn test_chart_without_values() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Chart.yaml", "name: bare\nversion: 0.1.0\n");
        write(dir.path(), "values.yaml", "");

        let chart = ChartDirLoader.load_chart(dir.path()).unwrap();
        let expected = Chart::from(ChartMetadata::new("bare", Version::new(0, 1, 0)));
        assert_eq!(chart, expected);
    }

    #[test]
    fn test_chart_yaml_absent() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "values.yaml", "a: b\n");

        let error = ChartDirLoader.load_chart(dir.path()).unwrap_err();
        assert!(matches!(error, Error::ChartYamlAbsent { path } if path == dir.path()));
    }

    #[test]
    fn test_chart_version_not_strict_semver() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Chart.yaml", "name: env\nversion: v0.0.1\n");

        let chart = ChartDirLoader.load_chart(dir.path()).unwrap();
        assert_eq!(chart.metadata().version(), "v0.0.1");
        assert_eq!(chart.metadata().semver(), Some(Version::new(0, 0, 1)));

        write(dir.path(), "Chart.yaml", "name: env\nversion: 1.0\nappVersion: 2\n");
        let chart = ChartDirLoader.load_chart(dir.path()).unwrap();
        assert_eq!(chart.metadata().version(), "1.0");
        assert_eq!(chart.metadata().app_version(), Some("2"));
        assert_eq!(chart.metadata().semver(), None);
    }

    #[test]
    fn test_chart_yaml_invalid() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Chart.yaml", "version: 1.0.0\n");

        let error = ChartDirLoader.load_chart(dir.path()).unwrap_err();
        assert!(matches!(error, Error::YamlParseFromFile { .. }));
    }

    #[test]
    fn test_chart_name_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Chart.yaml", "name: \"\"\nversion: 1.0.0\n");

        let error = ChartDirLoader.load_chart(dir.path()).unwrap_err();
        assert!(matches!(error, Error::EmptyChartName { .. }));
    }

    #[test]
    fn test_broken_sub_chart() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Chart.yaml", "name: env\nversion: 1.0.0\n");
        write(dir.path(), "charts/broken/values.yaml", "a: b\n");

        let error = ChartDirLoader.load_chart(dir.path()).unwrap_err();
        assert!(
            matches!(error, Error::ChartYamlAbsent { path } if path == dir.path().join("charts/broken"))
        );
    }
}
