//! Child process execution for the external formatter.
//!
//! Input is written to the child's stdin and stdout/stderr are drained on their own
//! threads, so a formatter that produces more output than a pipe buffer holds can never
//! deadlock against us. The calling thread blocks until the child exits.

use super::FormatError;
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Raw result of running the formatter.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output, byte for byte
    pub stdout: Vec<u8>,
    /// Standard error, lossily decoded (diagnostics only)
    pub stderr: String,
    /// Exit code, `None` when the child was killed by a signal
    pub exit_code: Option<i32>,
    /// Whether the tool exited with status 0
    pub success: bool,
}

/// Runs one external tool invocation at a time.
pub struct ToolExecutor {
    /// Default timeout in milliseconds, 0 for none
    default_timeout_ms: u64,
}

impl ToolExecutor {
    /// Create a new executor with the given default timeout.
    pub fn new(default_timeout_ms: u64) -> Self {
        Self { default_timeout_ms }
    }

    /// Run `program` with `args`, feeding `input` on stdin.
    ///
    /// A non-zero exit is *not* an error here; the caller inspects [`ToolOutput::success`].
    /// Errors are reserved for failing to start, drive, or wait for the child.
    pub fn execute(
        &self,
        program: &str,
        args: &[String],
        input: &[u8],
        timeout_ms: Option<u64>,
    ) -> Result<ToolOutput, FormatError> {
        if program.trim().is_empty() {
            return Err(FormatError::SpawnFailure {
                tool: program.to_string(),
                kind: io::ErrorKind::InvalidInput,
                reason: "empty command".to_string(),
            });
        }

        log::debug!("Spawning formatter: {program} {}", args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FormatError::spawn(program, &e))?;

        let stdout_handle = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || read_pipe(stdout)));
        let stderr_handle = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || read_pipe(stderr)));
        let stdin_handle = child.stdin.take().map(|mut stdin| {
            let input = input.to_vec();
            // Dropping `stdin` at the end of the closure closes the pipe
            thread::spawn(move || stdin.write_all(&input))
        });

        let timeout = Duration::from_millis(timeout_ms.unwrap_or(self.default_timeout_ms));
        let status = match wait_with_timeout(&mut child, program, timeout) {
            Ok(status) => status,
            Err(e) => {
                // A grandchild spawned by a wrapper script can outlive the killed child and
                // keep the pipes open, so the pipe threads are detached rather than joined
                drop((stdin_handle, stdout_handle, stderr_handle));
                return Err(e);
            }
        };

        if let Err(e) = join_writer(stdin_handle) {
            // A formatter may legitimately exit without consuming all of its input;
            // its exit status decides the outcome
            if e.kind() == io::ErrorKind::BrokenPipe {
                log::debug!("'{program}' closed stdin before reading all input");
            } else {
                return Err(FormatError::Io {
                    tool: program.to_string(),
                    message: format!("Failed to write to stdin: {e}"),
                });
            }
        }

        let stdout = join_reader(stdout_handle).map_err(|message| FormatError::Io {
            tool: program.to_string(),
            message,
        })?;
        let stderr = join_reader(stderr_handle).map_err(|message| FormatError::Io {
            tool: program.to_string(),
            message,
        })?;
        let exit_code = status.code();

        log::debug!("'{program}' exited with {exit_code:?} ({} bytes of output)", stdout.len());

        Ok(ToolOutput {
            stdout,
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code,
            success: status.success(),
        })
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TIMEOUT_MS)
    }
}

fn wait_with_timeout(child: &mut Child, program: &str, timeout: Duration) -> Result<ExitStatus, FormatError> {
    if timeout.is_zero() {
        return child.wait().map_err(|e| FormatError::Io {
            tool: program.to_string(),
            message: format!("Failed to wait for '{program}': {e}"),
        });
    }

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(|e| FormatError::Io {
            tool: program.to_string(),
            message: format!("Failed to poll '{program}': {e}"),
        })? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            log::warn!("'{program}' exceeded {}ms, killing it", timeout.as_millis());
            let _ = child.kill();
            let _ = child.wait();
            return Err(FormatError::Timeout {
                tool: program.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn read_pipe<R: Read>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => res.map_err(|e| format!("Failed to read output: {e}")),
            Err(_) => Err("Output reader thread panicked".to_string()),
        },
        None => Ok(Vec::new()),
    }
}

fn join_writer(handle: Option<thread::JoinHandle<io::Result<()>>>) -> io::Result<()> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer thread panicked"))),
        None => Ok(()),
    }
}
