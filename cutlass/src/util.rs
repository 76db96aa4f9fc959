use crate::LogOutput;
use std::io::Read;
use std::iter::repeat_with;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use std::{io, thread};

const TIMEOUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

// How long stream readers may keep draining after the process they belong to has exited or
// been killed. Descendants that inherited the pipes can keep them open indefinitely.
const STREAM_DRAIN_PERIOD: Duration = Duration::from_millis(500);

/// Generate a random Docker identifier.
///
/// It is suitable to be used as an image tag or container name.
///
/// See: [Docker Image Specification](https://github.com/moby/moby/blob/master/image/spec/v1.1.md)
pub(crate) fn random_docker_identifier() -> String {
    format!(
        "cutlass_{}",
        repeat_with(fastrand::lowercase)
            .take(30)
            .collect::<String>()
    )
}

/// Output of a command that ran to completion, regardless of its exit status.
#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub(crate) status: ExitStatus,
    pub(crate) log_output: LogOutput,
}

#[derive(Debug)]
pub(crate) enum RunCommandError {
    Spawn(io::Error),
    Io(io::Error),
    TimedOut(Duration, LogOutput),
}

/// Runs the given command to completion, capturing stdout and stderr.
///
/// Both streams are read in parallel while the process is running, so a child that fills one
/// pipe buffer can't block forever. If a timeout is given and the process is still running when
/// it elapses, the process is killed and the output captured so far is returned as part of the
/// error. With a timeout, the call returns shortly after the deadline even when processes
/// spawned by the child keep the output streams open.
pub(crate) fn run_command(
    command: impl Into<Command>,
    timeout: Option<Duration>,
) -> Result<CommandOutput, RunCommandError> {
    let mut command = command.into();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(RunCommandError::Spawn)?;

    let stdout_reader = child.stdout.take().map(StreamReader::spawn);
    let stderr_reader = child.stderr.take().map(StreamReader::spawn);

    let wait_outcome = match wait_with_timeout(&mut child, timeout) {
        Ok(wait_outcome) => wait_outcome,
        Err(io_error) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RunCommandError::Io(io_error));
        }
    };

    // Without a timeout, waiting for the streams to close is unbounded as well.
    let drain_period = timeout.map(|_| STREAM_DRAIN_PERIOD);
    let stdout_read_result = StreamReader::finish(stdout_reader, drain_period);
    let stderr_read_result = StreamReader::finish(stderr_reader, drain_period);

    let (stdout, stderr) = match (stdout_read_result, stderr_read_result) {
        (Ok(stdout), Ok(stderr)) => (stdout, stderr),
        (Err(io_error), _) | (_, Err(io_error)) => return Err(RunCommandError::Io(io_error)),
    };

    let log_output = LogOutput::from_bytes(&stdout, &stderr);

    match wait_outcome {
        WaitOutcome::Exited(status) => Ok(CommandOutput { status, log_output }),
        WaitOutcome::Killed(timeout) => Err(RunCommandError::TimedOut(timeout, log_output)),
    }
}

/// Reads a stream to its end on a detached thread, buffering everything read so far.
struct StreamReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<io::Result<()>>,
}

impl StreamReader {
    fn spawn<R: Read + Send + 'static>(mut stream: R) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (done_sender, done) = mpsc::channel();

        let thread_buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            let mut chunk = [0; 8192];

            let result = loop {
                match stream.read(&mut chunk) {
                    Ok(0) => break Ok(()),
                    Ok(length) => thread_buffer
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend_from_slice(&chunk[..length]),
                    Err(io_error) if io_error.kind() == io::ErrorKind::Interrupted => {}
                    Err(io_error) => break Err(io_error),
                }
            };

            // The receiving side is gone when the drain period elapsed.
            let _ = done_sender.send(result);
        });

        Self { buffer, done }
    }

    /// Waits for the stream to close and returns everything read from it.
    ///
    /// With a drain period, gives up waiting once it elapses and returns what has been read
    /// until then.
    fn finish(reader: Option<Self>, drain_period: Option<Duration>) -> io::Result<Vec<u8>> {
        let Some(reader) = reader else {
            return Ok(Vec::new());
        };

        let read_result = match drain_period {
            None => reader.done.recv().unwrap_or(Ok(())),
            Some(drain_period) => reader.done.recv_timeout(drain_period).unwrap_or(Ok(())),
        };

        let buffer = reader
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        read_result.map(|()| buffer)
    }
}

#[derive(Debug)]
enum WaitOutcome {
    Exited(ExitStatus),
    Killed(Duration),
}

fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> io::Result<WaitOutcome> {
    // Timeouts too large to be represented as a deadline can't ever elapse.
    let Some((timeout, deadline)) =
        timeout.and_then(|timeout| Some((timeout, Instant::now().checked_add(timeout)?)))
    else {
        return child.wait().map(WaitOutcome::Exited);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(WaitOutcome::Exited(status));
        }

        let now = Instant::now();
        if now >= deadline {
            child.kill()?;
            let status = child.wait()?;

            // The child might have exited on its own between `try_wait` and `kill`.
            return Ok(if terminated_by_signal(status) {
                WaitOutcome::Killed(timeout)
            } else {
                WaitOutcome::Exited(status)
            });
        }

        thread::sleep(TIMEOUT_POLL_INTERVAL.min(deadline - now));
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal().is_some()
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> bool {
    true
}
