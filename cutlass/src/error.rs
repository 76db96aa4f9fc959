use crate::LogOutput;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, io};

/// A workspace could not be provisioned.
#[derive(thiserror::Error, Debug)]
pub enum EnvironmentError {
    #[error("Couldn't create a temporary workspace directory in {0}: {1}")]
    CannotCreateTempDir(PathBuf, io::Error),
    #[error("Couldn't determine Cargo manifest directory: {0}")]
    CannotDetermineManifestDir(env::VarError),
    #[error("App fixture is not a valid directory: {0}")]
    FixtureNotADirectory(PathBuf),
    #[error("Couldn't copy app fixture {0} into the workspace: {1}")]
    CannotCopyFixture(PathBuf, fs_extra::error::Error),
}

/// A fixture file could not be written into a workspace.
#[derive(thiserror::Error, Debug)]
pub enum FixtureWriteError {
    #[error("Fixture path must be relative and must not contain `..` components: {0}")]
    InvalidPath(PathBuf),
    #[error("Couldn't write fixture {0}, the workspace has already been closed")]
    WorkspaceClosed(PathBuf),
    #[error("Couldn't create directory {0}: {1}")]
    CannotCreateDirectory(PathBuf, io::Error),
    #[error("Couldn't write fixture file {0}: {1}")]
    CannotWriteFile(PathBuf, io::Error),
}

/// The build tool could not be run to completion.
///
/// A build that ran but exited with a non-zero exit code is not an `InvocationError`, it is
/// reported as a [`BuildResult`](crate::BuildResult) instead.
#[derive(thiserror::Error, Debug)]
pub enum InvocationError {
    #[error("Couldn't spawn {0}: {1}")]
    CannotSpawn(String, io::Error),
    #[error("Couldn't run a build against {0}, the workspace has already been closed")]
    WorkspaceClosed(PathBuf),
    #[error("I/O error while waiting for {0}: {1}")]
    Io(String, io::Error),
    #[error("{program} did not exit within {timeout:?} and was killed")]
    TimedOut {
        program: String,
        timeout: Duration,
        log_output: LogOutput,
    },
}

/// Any error that can abort a harness transaction.
///
/// Allows using `?` on workspace and runner operations within a single transaction closure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    FixtureWrite(#[from] FixtureWriteError),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}
