//! Integration tests that talk to `pack` and Docker are skipped by default (using the `ignore`
//! attribute) since performing builds is slow. To run them use: `cargo test -- --ignored`.

// Enable Clippy lints that are disabled by default.
// https://rust-lang.github.io/rust-clippy/stable/index.html
#![warn(clippy::pedantic)]

use cutlass::{
    assert_contains, assert_not_contains, BuildConfig, EnvironmentError, Error, InvocationError,
    RunnerConfig, TestRunner, Workspace,
};
use indoc::indoc;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

const BUILDER: &str = "heroku/buildpacks:20";

fn runner() -> TestRunner {
    TestRunner::new(
        RunnerConfig::new(BUILDER)
            .timeout(Duration::from_secs(900))
            .clone(),
    )
}

fn write_gemfile(workspace: &Workspace) -> Result<(), Error> {
    workspace.write(
        "Gemfile",
        indoc! {"
            source 'https://rubygems.org'
            gem 'rake'
        "},
    )?;

    workspace.write(
        "Gemfile.lock",
        indoc! {"
            GEM
              remote: https://rubygems.org/
              specs:
                rake (13.0.6)

            PLATFORMS
              ruby
              x86_64-linux

            DEPENDENCIES
              rake

            BUNDLED WITH
               2.2.27
        "},
    )?;

    Ok(())
}

#[test]
#[ignore = "integration test"]
fn ruby_app_builds() {
    let runner = runner();

    Workspace::transaction(|workspace| {
        write_gemfile(workspace)?;

        runner.pack_build(workspace, BuildConfig::new(), |result| {
            assert!(result.success(), "{}", result.stderr);
            assert_contains!(result.stdout, "Installing rake");
            assert_contains!(result.stdout, "Successfully built image");
        })?;

        Ok(())
    })
    .unwrap();
}

#[test]
#[ignore = "integration test"]
fn app_without_manifest_fails_detection() {
    let runner = runner();

    Workspace::transaction(|workspace| {
        runner.pack_build(workspace, BuildConfig::new(), |result| {
            assert!(!result.success());
            assert!(!result.stderr.is_empty());
            assert_not_contains!(result.stdout, "Successfully built image");
        })?;

        Ok(())
    })
    .unwrap();
}

#[test]
#[ignore = "integration test"]
fn ruby_app_from_fixture_builds() {
    let runner = runner();

    Workspace::fixture_transaction("tests/fixtures/ruby-sample", |workspace| {
        runner.pack_build(
            workspace,
            BuildConfig::new().env("RAKE_ENV", "test"),
            |result| {
                assert!(result.success(), "{}", result.stderr);
                assert_contains!(result.stdout, "Installing rake");
            },
        )?;

        Ok(())
    })
    .unwrap();
}

#[test]
fn open_fails_when_directories_cannot_be_created() {
    let parent_dir = tempdir().unwrap();
    let not_a_directory = parent_dir.path().join("not-a-directory");
    fs::write(&not_a_directory, "").unwrap();

    let result = Workspace::open_in(&not_a_directory);

    assert!(matches!(
        result,
        Err(EnvironmentError::CannotCreateTempDir(path, _)) if path == not_a_directory
    ));
}

#[test]
fn missing_pack_binary_is_an_invocation_error() {
    let runner = TestRunner::new(
        RunnerConfig::new(BUILDER)
            .pack_binary("/usr/local/bin/definitely-not-pack")
            .remove_images(false)
            .clone(),
    );

    let result = Workspace::transaction(|workspace| {
        write_gemfile(workspace)?;

        runner.pack_build(workspace, BuildConfig::new(), |_| {
            unreachable!("No build result must be produced when pack can't be spawned.");
        })?;

        Ok(())
    });

    match result {
        Err(Error::Invocation(InvocationError::CannotSpawn(program, _))) => {
            assert_eq!(program, "/usr/local/bin/definitely-not-pack");
        }
        other => panic!("Expected an invocation error, got: {other:?}"),
    }
}

#[test]
fn workspace_is_removed_after_failed_invocation() {
    let runner = TestRunner::new(
        RunnerConfig::new(BUILDER)
            .pack_binary("/usr/local/bin/definitely-not-pack")
            .clone(),
    );
    let mut workspace_path = PathBuf::new();

    let result = Workspace::transaction(|workspace| {
        workspace_path = workspace.path().to_path_buf();
        write_gemfile(workspace)?;
        runner.run(workspace, BuildConfig::new())?;
        Ok(())
    });

    assert!(result.is_err());
    assert!(!workspace_path.as_os_str().is_empty());
    assert!(!workspace_path.exists());
}

#[test]
fn fixture_is_copied_into_workspace() {
    Workspace::fixture_transaction("tests/fixtures/ruby-sample", |workspace| {
        assert!(workspace.path().join("Gemfile").is_file());
        assert!(workspace.path().join("Gemfile.lock").is_file());
        assert!(workspace.path().join("Rakefile").is_file());

        workspace.write("Procfile", "web: bundle exec rake\n")?;
        Ok(())
    })
    .unwrap();

    assert!(!PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/ruby-sample/Procfile")
        .exists());
}
