use crate::PullPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every build a [`TestRunner`](crate::TestRunner) performs.
///
/// Create one per test suite and pass it to [`TestRunner::new`](crate::TestRunner::new). Builds
/// can override the default builder via [`BuildConfig::builder`](crate::BuildConfig::builder).
///
/// # Example
/// ```
/// use cutlass::{RunnerConfig, TestRunner};
/// use std::time::Duration;
///
/// let runner = TestRunner::new(
///     RunnerConfig::new("heroku/buildpacks:20")
///         .timeout(Duration::from_secs(600))
///         .clone(),
/// );
///
/// assert_eq!(runner.config().default_builder(), "heroku/buildpacks:20");
/// ```
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub(crate) default_builder: String,
    pub(crate) pack_binary: PathBuf,
    pub(crate) docker_binary: PathBuf,
    pub(crate) pull_policy: PullPolicy,
    pub(crate) timeout: Option<Duration>,
    pub(crate) remove_images: bool,
}

impl RunnerConfig {
    /// Creates a new runner configuration with the given default builder.
    pub fn new(default_builder: impl Into<String>) -> Self {
        Self {
            default_builder: default_builder.into(),
            pack_binary: PathBuf::from("pack"),
            docker_binary: PathBuf::from("docker"),
            pull_policy: PullPolicy::IfNotPresent,
            timeout: None,
            remove_images: true,
        }
    }

    #[must_use]
    pub fn default_builder(&self) -> &str {
        &self.default_builder
    }

    /// Sets the `pack` binary to invoke. Defaults to `pack`, looked up on the `PATH`.
    pub fn pack_binary(&mut self, pack_binary: impl Into<PathBuf>) -> &mut Self {
        self.pack_binary = pack_binary.into();
        self
    }

    /// Sets the `docker` binary used to remove built images. Defaults to `docker`.
    pub fn docker_binary(&mut self, docker_binary: impl Into<PathBuf>) -> &mut Self {
        self.docker_binary = docker_binary.into();
        self
    }

    /// Sets the pull policy passed to `pack`. Defaults to [`PullPolicy::IfNotPresent`].
    pub fn pull_policy(&mut self, pull_policy: PullPolicy) -> &mut Self {
        self.pull_policy = pull_policy;
        self
    }

    /// Sets the maximum time a single build may take before `pack` is killed.
    ///
    /// Without a timeout (the default), a hanging build blocks the test forever.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether to remove the image `pack` built once the build's verification has finished.
    ///
    /// Defaults to `true`.
    pub fn remove_images(&mut self, remove_images: bool) -> &mut Self {
        self.remove_images = remove_images;
        self
    }
}
