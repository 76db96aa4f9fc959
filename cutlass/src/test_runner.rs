use crate::docker::DockerRemoveImageCommand;
use crate::pack::PackBuildCommand;
use crate::util::{self, RunCommandError};
use crate::{BuildConfig, BuildResult, InvocationError, RunnerConfig, Workspace};
use std::borrow::Borrow;
use std::path::PathBuf;
use std::time::Instant;

/// Runner for `pack build` integration tests.
///
/// The runner holds no mutable state, a single instance can be shared between tests running in
/// parallel as long as every test builds its own [`Workspace`].
///
/// # Example
/// ```no_run
/// use cutlass::{assert_contains, BuildConfig, RunnerConfig, TestRunner, Workspace};
///
/// let runner = TestRunner::new(RunnerConfig::new("heroku/buildpacks:20"));
///
/// Workspace::transaction(|workspace| {
///     workspace.write("Gemfile", "source 'https://rubygems.org'\ngem 'rake'\n")?;
///
///     runner.pack_build(workspace, BuildConfig::new(), |result| {
///         assert!(result.success());
///         assert_contains!(result.stdout, "Installing rake");
///     })?;
///
///     Ok(())
/// })
/// .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct TestRunner {
    config: RunnerConfig,
}

impl TestRunner {
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Builds the app in the given workspace with `pack` and captures the outcome.
    ///
    /// Blocks until `pack` exits. A build that fails is reported as a [`BuildResult`] whose
    /// [`success`](BuildResult::success) is `false`, only infrastructure problems (`pack` can't be
    /// spawned, its output can't be read, or it exceeded the configured timeout) are reported
    /// as [`InvocationError`]. Builds are never retried.
    ///
    /// The image built by `pack` is left in place. Use [`TestRunner::pack_build`] to have it
    /// removed after verification.
    pub fn run<C: Borrow<BuildConfig>>(
        &self,
        workspace: &Workspace,
        config: C,
    ) -> Result<BuildResult, InvocationError> {
        let config = config.borrow();

        if !workspace.is_open() {
            return Err(InvocationError::WorkspaceClosed(
                workspace.path().to_path_buf(),
            ));
        }

        let builder = config
            .builder_name
            .clone()
            .unwrap_or_else(|| self.config.default_builder.clone());

        let image_name = config
            .image_name
            .clone()
            .unwrap_or_else(util::random_docker_identifier);

        let mut pack_command = PackBuildCommand::new(
            &self.config.pack_binary,
            &builder,
            workspace.path(),
            &image_name,
            self.config.pull_policy,
        );

        config.env.iter().for_each(|(key, value)| {
            pack_command.env(key, value);
        });

        for buildpack in &config.buildpacks {
            pack_command.buildpack(buildpack.clone());
        }

        pack_command
            .trust_builder(config.trust_builder)
            .verbose(config.verbose);

        let program = self.config.pack_binary.display().to_string();

        log::debug!(
            "Spawning `{program} build` for {} with builder {builder}",
            workspace.path().display()
        );

        let started = Instant::now();

        let output = util::run_command(pack_command, self.config.timeout).map_err(|error| {
            log::debug!("`{program} build` for {image_name} failed to complete");

            match error {
                RunCommandError::Spawn(io_error) => {
                    InvocationError::CannotSpawn(program.clone(), io_error)
                }
                RunCommandError::Io(io_error) => InvocationError::Io(program.clone(), io_error),
                RunCommandError::TimedOut(timeout, log_output) => InvocationError::TimedOut {
                    program: program.clone(),
                    timeout,
                    log_output,
                },
            }
        })?;

        let duration = started.elapsed();

        log::info!(
            "`{program} build` for {image_name} completed in {duration:?} ({})",
            output.status
        );

        Ok(BuildResult {
            stdout: output.log_output.stdout,
            stderr: output.log_output.stderr,
            exit_code: output.status.code(),
            success: output.status.success(),
            duration,
            builder,
            image_name,
        })
    }

    /// Builds the app in the given workspace and passes the outcome to the given function.
    ///
    /// Behaves like [`TestRunner::run`], but returns whatever the verification function returns.
    /// The runner makes no pass/fail judgement itself. Once the function has returned (or
    /// panicked), the image built by `pack` is removed unless disabled via
    /// [`RunnerConfig::remove_images`]. Images named explicitly via
    /// [`BuildConfig::image_name`] are never removed.
    ///
    /// # Example
    /// ```no_run
    /// use cutlass::{assert_contains, BuildConfig, RunnerConfig, TestRunner, Workspace};
    ///
    /// let runner = TestRunner::new(RunnerConfig::new("heroku/buildpacks:20"));
    ///
    /// Workspace::transaction(|workspace| {
    ///     runner.pack_build(workspace, BuildConfig::new(), |result| {
    ///         assert!(!result.success());
    ///         assert_contains!(result.stderr, "No buildpack groups passed detection");
    ///     })?;
    ///
    ///     Ok(())
    /// })
    /// .unwrap();
    /// ```
    pub fn pack_build<C: Borrow<BuildConfig>, R, F: FnOnce(BuildResult) -> R>(
        &self,
        workspace: &Workspace,
        config: C,
        f: F,
    ) -> Result<R, InvocationError> {
        let config = config.borrow();
        let build_result = self.run(workspace, config)?;

        let remove_image = self.config.remove_images && config.image_name.is_none();
        let _temporary_image = remove_image.then(|| TemporaryImage {
            docker_binary: self.config.docker_binary.clone(),
            image_name: build_result.image_name.clone(),
        });

        Ok(f(build_result))
    }
}

struct TemporaryImage {
    docker_binary: PathBuf,
    image_name: String,
}

impl Drop for TemporaryImage {
    fn drop(&mut self) {
        // Ignoring errors here since we don't want to panic inside Drop.
        // We don't emit a warning since that gets too noisy in some common
        // cases (such as running a test suite when Docker isn't started).
        let _ = util::run_command(
            DockerRemoveImageCommand::new(&self.docker_binary, &self.image_name),
            None,
        );
    }
}
