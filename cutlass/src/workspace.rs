use crate::{EnvironmentError, Error, FixtureWriteError};
use fs_extra::dir::CopyOptions;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

const WORKSPACE_DIR_PREFIX: &str = "cutlass_";

/// An isolated temporary app directory for a single test.
///
/// Every workspace gets a freshly generated, unique directory, so concurrently running tests
/// never see each other's fixture files. The directory is removed recursively when the workspace
/// is closed, either explicitly via [`Workspace::close`] or implicitly when it is dropped. This
/// includes unwinding after a failed assertion.
///
/// # Example
/// ```
/// use cutlass::Workspace;
///
/// let mut workspace = Workspace::open().unwrap();
/// workspace.write("Procfile", "web: bundle exec puma").unwrap();
/// assert!(workspace.path().join("Procfile").is_file());
///
/// workspace.close();
/// assert!(!workspace.path().exists());
/// ```
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    temp_dir: Option<TempDir>,
}

impl Workspace {
    /// Opens a new, empty workspace in the system's temporary directory.
    pub fn open() -> Result<Self, EnvironmentError> {
        Self::open_in(env::temp_dir())
    }

    /// Opens a new, empty workspace in the given parent directory.
    pub fn open_in(parent_dir: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        let parent_dir = parent_dir.as_ref();

        let temp_dir = tempfile::Builder::new()
            .prefix(WORKSPACE_DIR_PREFIX)
            .tempdir_in(parent_dir)
            .map_err(|error| {
                EnvironmentError::CannotCreateTempDir(parent_dir.to_path_buf(), error)
            })?;

        log::debug!("Opened workspace {}", temp_dir.path().display());

        Ok(Self {
            path: temp_dir.path().to_path_buf(),
            temp_dir: Some(temp_dir),
        })
    }

    /// Opens a new workspace and copies the contents of an existing app fixture into it.
    ///
    /// Relative paths are treated as relative to the Cargo manifest directory
    /// ([`CARGO_MANIFEST_DIR`](https://doc.rust-lang.org/cargo/reference/environment-variables.html#environment-variables-cargo-sets-for-crates)),
    /// i.e. the package's root directory. The fixture itself is never modified.
    pub fn from_fixture(app_dir: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        let app_dir = absolute_app_dir(app_dir.as_ref())?;

        if !app_dir.is_dir() {
            return Err(EnvironmentError::FixtureNotADirectory(app_dir));
        }

        let workspace = Self::open()?;

        fs_extra::dir::copy(
            &app_dir,
            &workspace.path,
            &CopyOptions {
                content_only: true,
                ..CopyOptions::default()
            },
        )
        .map_err(|error| EnvironmentError::CannotCopyFixture(app_dir.clone(), error))?;

        Ok(workspace)
    }

    /// Runs the given function against a new, empty workspace and closes the workspace afterwards.
    ///
    /// The workspace is torn down on every exit path: when the function returns `Ok`, when it
    /// returns `Err`, and when it panics.
    ///
    /// # Example
    /// ```
    /// use cutlass::Workspace;
    ///
    /// let gemfile = Workspace::transaction(|workspace| {
    ///     let gemfile = workspace.write("Gemfile", "gem 'rake'")?;
    ///     assert!(gemfile.is_file());
    ///     Ok(gemfile)
    /// })
    /// .unwrap();
    ///
    /// assert!(!gemfile.exists());
    /// ```
    pub fn transaction<T, F: FnOnce(&Workspace) -> Result<T, Error>>(f: F) -> Result<T, Error> {
        Self::open()?.run_transaction(f)
    }

    /// Like [`Workspace::transaction`], but the workspace starts out as a copy of the given app
    /// fixture directory. See [`Workspace::from_fixture`].
    pub fn fixture_transaction<T, F: FnOnce(&Workspace) -> Result<T, Error>>(
        app_dir: impl AsRef<Path>,
        f: F,
    ) -> Result<T, Error> {
        Self::from_fixture(app_dir)?.run_transaction(f)
    }

    fn run_transaction<T, F: FnOnce(&Workspace) -> Result<T, Error>>(
        mut self,
        f: F,
    ) -> Result<T, Error> {
        let result = f(&self);
        self.close();
        result
    }

    /// The root directory of this workspace.
    ///
    /// The path stays valid after the workspace has been closed, but no longer exists on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.temp_dir.is_some()
    }

    /// Writes a fixture file into the workspace, creating parent directories as needed.
    ///
    /// The path must be relative and must not contain `..` components, so every fixture ends up
    /// inside the workspace root. Returns the absolute path of the written file.
    pub fn write(
        &self,
        relative_path: impl AsRef<Path>,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, FixtureWriteError> {
        let relative_path = relative_path.as_ref();

        if !self.is_open() {
            return Err(FixtureWriteError::WorkspaceClosed(
                relative_path.to_path_buf(),
            ));
        }

        if !is_contained_relative_path(relative_path) {
            return Err(FixtureWriteError::InvalidPath(relative_path.to_path_buf()));
        }

        let path = self.path.join(relative_path);

        if let Some(parent_dir) = path.parent() {
            fs::create_dir_all(parent_dir).map_err(|error| {
                FixtureWriteError::CannotCreateDirectory(parent_dir.to_path_buf(), error)
            })?;
        }

        fs::write(&path, contents)
            .map_err(|error| FixtureWriteError::CannotWriteFile(path.clone(), error))?;

        Ok(path)
    }

    /// Recursively removes the workspace directory.
    ///
    /// Closing an already closed workspace does nothing. Removal failures are logged instead of
    /// returned, so that teardown never masks the outcome of the test itself.
    pub fn close(&mut self) {
        if let Some(temp_dir) = self.temp_dir.take() {
            match temp_dir.close() {
                Ok(()) => log::debug!("Closed workspace {}", self.path.display()),
                Err(error) => log::warn!(
                    "Couldn't remove workspace {}: {error}",
                    self.path.display()
                ),
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.close();
    }
}

fn absolute_app_dir(app_dir: &Path) -> Result<PathBuf, EnvironmentError> {
    if app_dir.is_absolute() {
        Ok(app_dir.to_path_buf())
    } else {
        env::var("CARGO_MANIFEST_DIR")
            .map_err(EnvironmentError::CannotDetermineManifestDir)
            .map(|cargo_manifest_dir| PathBuf::from(cargo_manifest_dir).join(app_dir))
    }
}

fn is_contained_relative_path(path: &Path) -> bool {
    let mut has_file_name = false;

    for component in path.components() {
        match component {
            Component::Normal(_) => has_file_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }

    has_file_name
}
