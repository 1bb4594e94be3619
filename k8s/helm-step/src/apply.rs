use crate::{
    common::{
        constants::{DEPLOY_NAMESPACE_ENV, RELEASE_CHARTS_REPO_NAME, WAIT_TIMEOUT},
        error::{LoadPack, NoNamespace, Result},
    },
    helm::{binary::HelmBinary, client::HelmClient, upgrade::HelmUpgrade},
    opts::ApplyArgs,
};
use console_logger::highlight;
use pack::{ChartDirLoader, ChartLoader};
use snafu::{OptionExt, ResultExt};
use std::{env, path::Path};
use tracing::info;
use url::Url;

/// Applies the helm chart in `args.dir()` to the Namespace, as a helm upgrade which installs
/// the release if it does not exist.
pub(crate) async fn apply<H>(helm: &H, args: &ApplyArgs) -> Result<()>
where
    H: HelmClient + ?Sized,
{
    let dir = args.dir();
    let chart = ChartDirLoader.load_chart(dir).context(LoadPack)?;
    info!(
        name = chart.metadata().name(),
        version = %chart.metadata().version(),
        "Found helm chart"
    );

    let binary = init_dependency_build(helm, dir, args.release_charts_url()).await?;

    let namespace = resolve_namespace(args.namespace(), env::var(DEPLOY_NAMESPACE_ENV).ok())?;
    let release_name = resolve_release_name(args.name(), binary, namespace.as_str());

    console_logger::print(
        format!(
            "Applying helm chart at {} as release name {} to namespace {}",
            highlight(dir.to_string_lossy()),
            highlight(release_name.as_str()),
            highlight(namespace.as_str())
        )
        .as_str(),
    );

    let upgrade = HelmUpgrade::builder()
        .with_release_name(release_name)
        .with_namespace(namespace)
        .with_chart_dir(dir)
        .with_install(true)
        .with_wait_timeout(args.wait().then_some(WAIT_TIMEOUT))
        .build()?;

    helm.upgrade(&upgrade).await?;

    info!(
        release = upgrade.release_name(),
        namespace = upgrade.namespace(),
        "Applied helm chart"
    );
    Ok(())
}

/// Prepares the helm client and fetches the chart's dependencies into its charts directory.
/// Returns the binary which was prepared.
pub(crate) async fn init_dependency_build<H>(
    helm: &H,
    chart_dir: &Path,
    release_charts_url: &Url,
) -> Result<HelmBinary>
where
    H: HelmClient + ?Sized,
{
    let binary = helm.binary();
    let version = helm.version().await?;
    info!(%binary, %version, "Validated helm binary");

    if binary.requires_client_init() {
        helm.init_client_only().await?;
    }

    helm.add_repo(RELEASE_CHARTS_REPO_NAME, release_charts_url)
        .await?;
    helm.dependency_build(chart_dir).await?;

    Ok(binary)
}

/// The Namespace is mandatory. An absent or empty option falls back to the value of the
/// $DEPLOY_NAMESPACE environment variable, `env_namespace`.
fn resolve_namespace(namespace: Option<&str>, env_namespace: Option<String>) -> Result<String> {
    namespace
        .filter(|ns| !ns.is_empty())
        .map(ToString::to_string)
        .or(env_namespace.filter(|ns| !ns.is_empty()))
        .context(NoNamespace)
}

fn resolve_release_name(name: Option<&str>, binary: HelmBinary, namespace: &str) -> String {
    match name {
        Some(name) => name.to_string(),
        None => binary.default_release_name(namespace),
    }
}
