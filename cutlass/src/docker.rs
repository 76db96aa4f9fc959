use std::path::PathBuf;
use std::process::Command;

/// Represents a `docker rmi` command.
#[derive(Clone, Debug)]
pub(crate) struct DockerRemoveImageCommand {
    program: PathBuf,
    force: bool,
    image_name: String,
}

impl DockerRemoveImageCommand {
    pub(crate) fn new(program: impl Into<PathBuf>, image_name: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            force: true,
            image_name: image_name.into(),
        }
    }
}

impl From<DockerRemoveImageCommand> for Command {
    fn from(docker_remove_image_command: DockerRemoveImageCommand) -> Self {
        let mut command = Command::new(docker_remove_image_command.program);
        command.args(["rmi", &docker_remove_image_command.image_name]);

        if docker_remove_image_command.force {
            command.arg("--force");
        }

        command
    }
}
