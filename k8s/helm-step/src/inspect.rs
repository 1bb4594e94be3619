use crate::{
    common::error::{LoadPack, Result},
    opts::PackArgs,
};
use console_logger::highlight;
use pack::Pack;
use snafu::ResultExt;

/// Loads the pack in `args.dir()` and prints its charts and files.
pub(crate) fn inspect(args: &PackArgs) -> Result<()> {
    let pack = pack::from_dir(args.dir()).context(LoadPack)?;

    console_logger::info(
        format!(
            "Pack at {} has {} chart(s) and {} file(s)",
            args.dir().display(),
            pack.charts().len(),
            pack.files().len()
        )
        .as_str(),
    );
    for line in summary(&pack) {
        console_logger::print(line.as_str());
    }
    Ok(())
}

/// One line per chart, in directory order, followed by one line per file, sorted by name.
fn summary(pack: &Pack) -> Vec<String> {
    let charts = pack.charts().iter().map(|chart| {
        format!(
            "  chart {} {} ({} templates, {} sub-charts)",
            highlight(chart.metadata().name()),
            chart.metadata().version(),
            chart.templates().len(),
            chart.dependencies().len()
        )
    });

    let mut names: Vec<&String> = pack.files().keys().collect();
    names.sort();
    let files = names
        .into_iter()
        .map(|name| format!("  file {}", highlight(name)));

    charts.chain(files).collect()
}
