use std::time::Duration;

/// The captured outcome of a single `pack build` invocation.
///
/// A build that exits with a non-zero exit code still produces a `BuildResult`, so tests can
/// assert on failing builds just like on successful ones.
#[derive(Clone, Debug)]
pub struct BuildResult {
    /// Standard output of `pack`, interpreted as an UTF-8 string.
    pub stdout: String,
    /// Standard error of `pack`, interpreted as an UTF-8 string.
    pub stderr: String,
    /// Exit code of `pack`, `None` if it was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Wall-clock time between spawning `pack` and its exit.
    pub duration: Duration,
    /// The builder that performed the build.
    pub builder: String,
    /// The name of the image `pack` was asked to build.
    pub image_name: String,

    pub(crate) success: bool,
}

impl BuildResult {
    /// Whether `pack` exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }
}
