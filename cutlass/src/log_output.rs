/// Log output from a command.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct LogOutput {
    pub stdout: String,
    pub stderr: String,
}

impl LogOutput {
    pub(crate) fn from_bytes(stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }
}
