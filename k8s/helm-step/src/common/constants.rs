use std::time::Duration;

/// This is the environment variable which carries the fallback Namespace for `apply`.
pub(crate) const DEPLOY_NAMESPACE_ENV: &str = "DEPLOY_NAMESPACE";

/// This is the environment variable which selects the helm binary.
pub(crate) const HELM_BINARY_ENV: &str = "HELM_BINARY";

/// This is the environment variable which carries the URL of the release charts repository.
pub(crate) const RELEASE_CHARTS_URL_ENV: &str = "RELEASE_CHARTS_URL";

/// This is the default URL of the chart repository which carries the release charts.
pub(crate) const DEFAULT_RELEASE_CHARTS_URL: &str = "http://chartmuseum.jenkins-x.io";

/// This is the name under which the release charts repository is added to helm.
pub(crate) const RELEASE_CHARTS_REPO_NAME: &str = "releases";

/// This is the release name used by helm v3 when none is given.
pub(crate) const DEFAULT_RELEASE_NAME: &str = "jx";

/// This is how long `helm upgrade --wait` waits for the release's resources to become ready.
pub(crate) const WAIT_TIMEOUT: Duration = Duration::from_secs(600);
