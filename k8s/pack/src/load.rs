use crate::{
    chart::{Chart, ChartDirLoader, ChartLoader},
    error::{
        CollectDirEntries, NonUtf8FileName, OpeningFile, PathResolution, ReadingDirectoryContents,
        ReadingFileType, Result,
    },
};
use snafu::ResultExt;
use std::{
    collections::HashMap,
    fs::{self, DirEntry, File},
    path::{self, Path},
};
use tracing::debug;

/// A directory of charts and loose files, loaded into memory.
///
/// Every file handle in a Pack is open, and is closed when the Pack (or the handle, after
/// [`Pack::into_parts`]) is dropped.
#[derive(Debug, Default)]
pub struct Pack {
    charts: Vec<Chart>,
    files: HashMap<String, File>,
}

impl Pack {
    /// The charts loaded from the sub-directories, in directory listing order.
    pub fn charts(&self) -> &[Chart] {
        self.charts.as_slice()
    }

    /// The open file handles, keyed by file name.
    pub fn files(&self) -> &HashMap<String, File> {
        &self.files
    }

    /// Gets the open handle for the file `name`, if there is one.
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    /// The total number of directory entries which make up this Pack.
    pub fn len(&self) -> usize {
        self.charts.len() + self.files.len()
    }

    /// Returns true if the Pack was loaded from an empty directory.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes ownership of the charts and the open file handles.
    pub fn into_parts(self) -> (Vec<Chart>, HashMap<String, File>) {
        (self.charts, self.files)
    }
}

/// Loads a Pack out of a directory. Sub-directories are handed to the ChartLoader, everything
/// else is opened as a file.
#[derive(Debug, Clone, Default)]
pub struct PackLoader<L = ChartDirLoader> {
    chart_loader: L,
}

impl<L> PackLoader<L>
where
    L: ChartLoader,
{
    /// Creates a PackLoader which loads sub-directories using `chart_loader`.
    pub fn new(chart_loader: L) -> Self {
        Self { chart_loader }
    }

    /// Loads the Pack in directory `dir`.
    ///
    /// This fails on the first entry which cannot be loaded. An error from the ChartLoader is
    /// returned unchanged. Handles opened before the failure are closed.
    pub fn from_dir<P>(&self, dir: P) -> Result<Pack>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let topdir = path::absolute(dir).context(PathResolution {
            path: dir.to_path_buf(),
        })?;

        let mut pack = Pack::default();
        for entry in read_dir_sorted(topdir.as_path())? {
            let entry_path = entry.path();
            let file_type = entry.file_type().context(ReadingFileType {
                path: entry_path.clone(),
            })?;

            if file_type.is_dir() {
                let chart = self.chart_loader.load_chart(entry_path.as_path())?;
                pack.charts.push(chart);
            } else {
                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(_) => return NonUtf8FileName { path: entry_path }.fail(),
                };
                let file = File::open(entry_path.as_path()).context(OpeningFile {
                    filepath: entry_path,
                })?;
                pack.files.insert(name, file);
            }
        }

        debug!(
            path = %topdir.display(),
            charts = pack.charts.len(),
            files = pack.files.len(),
            "Loaded pack"
        );
        Ok(pack)
    }
}

/// Loads the Pack in directory `dir`, using a [`ChartDirLoader`] for the sub-directories.
pub fn from_dir<P>(dir: P) -> Result<Pack>
where
    P: AsRef<Path>,
{
    PackLoader::new(ChartDirLoader).from_dir(dir)
}

/// Lists the entries of a directory, sorted by file name.
pub(crate) fn read_dir_sorted(path: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(path)
        .context(ReadingDirectoryContents {
            path: path.to_path_buf(),
        })?
        .collect::<Result<Vec<_>, std::io::Error>>()
        .context(CollectDirEntries {
            path: path.to_path_buf(),
        })?;

    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::{from_dir, PackLoader};
    use crate::{
        chart::{Chart, ChartMetadata},
        error::{Error, Result},
    };
    use semver::Version;
    use std::{
        fs,
        io::Read,
        path::{Path, PathBuf},
    };
    use tempfile::TempDir;

    fn chart_dir(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("templates")).unwrap();
        fs::write(
            dir.join("Chart.yaml"),
            format!("name: {name}\nversion: 1.0.0\n"),
        )
        .unwrap();
        fs::write(dir.join("templates/cm.yaml"), "kind: ConfigMap\n").unwrap();
    }

    fn chart_names(charts: &[Chart]) -> Vec<&str> {
        charts.iter().map(|c| c.metadata().name()).collect()
    }

    #[test]
    fn test_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.yaml"), "b: c").unwrap();

        let pack = from_dir(dir.path()).unwrap();
        assert!(pack.charts().is_empty());
        assert_eq!(pack.files().len(), 2);

        let mut contents = String::new();
        pack.file("b.yaml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "b: c");
        assert!(pack.file("a.txt").is_some());
    }

    #[test]
    fn test_charts_only() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            chart_dir(dir.path(), name);
        }

        let pack = from_dir(dir.path()).unwrap();
        assert!(pack.files().is_empty());
        assert_eq!(chart_names(pack.charts()), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_mixed() {
        let dir = TempDir::new().unwrap();
        chart_dir(dir.path(), "templates");
        fs::write(dir.path().join("README.md"), "# pack").unwrap();

        let pack = from_dir(dir.path()).unwrap();
        assert_eq!(pack.len(), 2);
        assert_eq!(chart_names(pack.charts()), vec!["templates"]);
        assert_eq!(
            pack.files().keys().collect::<Vec<_>>(),
            vec![&"README.md".to_string()]
        );

        let (charts, files) = pack.into_parts();
        assert_eq!(charts.len(), 1);
        assert!(files.contains_key("README.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("values.yaml"), "").unwrap();

        // Walk up from the working directory to the filesystem root, then down to the
        // temporary directory.
        let cwd = std::env::current_dir().unwrap();
        let relative: PathBuf = cwd
            .components()
            .skip(1)
            .map(|_| Path::new(".."))
            .collect::<PathBuf>()
            .join(dir.path().strip_prefix("/").unwrap());
        assert!(relative.is_relative());

        let pack = from_dir(relative).unwrap();
        assert!(pack.file("values.yaml").is_some());
    }

    #[test]
    fn test_empty_dir() {
        let dir = TempDir::new().unwrap();
        let pack = from_dir(dir.path()).unwrap();
        assert!(pack.is_empty());
    }

    #[test]
    fn test_chart_loader_error_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("broken-chart")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let loader = PackLoader::new(|path: &Path| -> Result<Chart> {
            Err(Error::EmptyChartName {
                path: path.join("Chart.yaml"),
            })
        });
        let error = loader.from_dir(dir.path()).unwrap_err();
        assert!(
            matches!(error, Error::EmptyChartName { path } if path == dir.path().join("broken-chart/Chart.yaml"))
        );
    }

    #[test]
    fn test_broken_chart_aborts_load() {
        let dir = TempDir::new().unwrap();
        chart_dir(dir.path(), "a-good-chart");
        fs::create_dir(dir.path().join("broken-chart")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let error = from_dir(dir.path()).unwrap_err();
        assert!(
            matches!(error, Error::ChartYamlAbsent { path } if path == dir.path().join("broken-chart"))
        );
    }

    #[test]
    fn test_custom_chart_loader() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("one")).unwrap();
        fs::create_dir(dir.path().join("two")).unwrap();

        let loader = PackLoader::new(|path: &Path| -> Result<Chart> {
            let name = path.file_name().unwrap().to_string_lossy();
            Ok(Chart::from(ChartMetadata::new(name, Version::new(0, 1, 0))))
        });
        let pack = loader.from_dir(dir.path()).unwrap();
        assert_eq!(chart_names(pack.charts()), vec!["one", "two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_open_failure_aborts_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();

        let error = from_dir(dir.path()).unwrap_err();
        assert!(
            matches!(error, Error::OpeningFile { filepath, .. } if filepath == dir.path().join("dangling"))
        );
    }

    #[test]
    fn test_nonexistent_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let error = from_dir(missing.as_path()).unwrap_err();
        assert!(matches!(error, Error::ReadingDirectoryContents { path, .. } if path == missing));
    }

    #[test]
    fn test_not_a_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(file.as_path(), "a").unwrap();

        let error = from_dir(file.as_path()).unwrap_err();
        assert!(matches!(error, Error::ReadingDirectoryContents { .. }));
    }

    #[test]
    fn test_empty_path() {
        let error = from_dir("").unwrap_err();
        assert!(matches!(error, Error::PathResolution { .. }));
    }
}
