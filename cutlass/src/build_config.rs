use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration for a single `pack build` invocation.
///
/// Everything that isn't set here falls back to the [`RunnerConfig`](crate::RunnerConfig) of the
/// [`TestRunner`](crate::TestRunner) performing the build.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub(crate) builder_name: Option<String>,
    pub(crate) buildpacks: Vec<BuildpackReference>,
    pub(crate) env: HashMap<String, String>,
    pub(crate) image_name: Option<String>,
    pub(crate) trust_builder: bool,
    pub(crate) verbose: bool,
}

impl BuildConfig {
    /// Creates a new build configuration that uses the runner's default builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the runner's default builder for this build.
    ///
    /// # Example
    /// ```no_run
    /// use cutlass::{BuildConfig, RunnerConfig, TestRunner, Workspace};
    ///
    /// let runner = TestRunner::new(RunnerConfig::new("heroku/buildpacks:20"));
    ///
    /// Workspace::transaction(|workspace| {
    ///     runner.pack_build(
    ///         workspace,
    ///         BuildConfig::new().builder("heroku/builder:22"),
    ///         |result| {
    ///             assert_eq!(result.builder, "heroku/builder:22");
    ///         },
    ///     )?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// ```
    pub fn builder(&mut self, builder_name: impl Into<String>) -> &mut Self {
        self.builder_name = Some(builder_name.into());
        self
    }

    /// Sets the buildpacks (and their ordering) to use when building the app.
    ///
    /// Defaults to no explicit buildpacks, leaving buildpack detection to the builder.
    pub fn buildpacks(&mut self, buildpacks: impl Into<Vec<BuildpackReference>>) -> &mut Self {
        self.buildpacks = buildpacks.into();
        self
    }

    /// Inserts or updates an environment variable mapping for the build process.
    pub fn env(&mut self, k: impl Into<String>, v: impl Into<String>) -> &mut Self {
        self.env.insert(k.into(), v.into());
        self
    }

    /// Adds or updates multiple environment variable mappings for the build process.
    pub fn envs<K: Into<String>, V: Into<String>, I: IntoIterator<Item = (K, V)>>(
        &mut self,
        envs: I,
    ) -> &mut Self {
        envs.into_iter().for_each(|(key, value)| {
            self.env(key.into(), value.into());
        });

        self
    }

    /// Sets the name of the image `pack` should build.
    ///
    /// Defaults to a random name that is unique to the invocation. Sharing an image name between
    /// concurrently running builds will make them interfere with each other.
    ///
    /// An explicitly named image is left in place after [`TestRunner::pack_build`](crate::TestRunner::pack_build),
    /// only images with generated names are removed.
    pub fn image_name(&mut self, image_name: impl Into<String>) -> &mut Self {
        self.image_name = Some(image_name.into());
        self
    }

    /// Whether to pass `--trust-builder` to `pack`. Defaults to `true`.
    pub fn trust_builder(&mut self, trust_builder: bool) -> &mut Self {
        self.trust_builder = trust_builder;
        self
    }

    /// Whether to pass `--verbose` to `pack`. Defaults to `false`.
    pub fn verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            builder_name: None,
            buildpacks: Vec::new(),
            env: HashMap::new(),
            image_name: None,
            trust_builder: true,
            verbose: false,
        }
    }
}

/// References a Cloud Native Buildpack.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BuildpackReference {
    /// References a buildpack by id, image or URL.
    Id(String),
    /// References a buildpack in a local directory or tarball.
    Path(PathBuf),
}

impl From<String> for BuildpackReference {
    fn from(id: String) -> Self {
        BuildpackReference::Id(id)
    }
}

impl From<&str> for BuildpackReference {
    fn from(id: &str) -> Self {
        BuildpackReference::Id(String::from(id))
    }
}

impl From<PathBuf> for BuildpackReference {
    fn from(path: PathBuf) -> Self {
        BuildpackReference::Path(path)
    }
}

impl From<&Path> for BuildpackReference {
    fn from(path: &Path) -> Self {
        BuildpackReference::Path(path.to_path_buf())
    }
}
