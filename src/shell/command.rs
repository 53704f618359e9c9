//! Shell command execution.

use crate::error::{Result, RigupError};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running command is polled for exit while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output pipes may stay open after the shell itself has exited.
///
/// A background process started by the command inherits the pipes; its
/// output is not waited for beyond this.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// First non-empty line of stdout, falling back to stderr.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Kill the command if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Options with only a timeout set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Execute a shell command, capturing stdout and stderr.
///
/// A non-zero exit is returned as a `CommandResult` with `success == false`.
/// Failing to start the shell is `CommandFailed`; exceeding the timeout kills
/// the process and is `CommandTimedOut`.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let shell = detect_shell();
    let mut cmd = Command::new(&shell);
    cmd.arg(shell_flag());
    cmd.arg(command);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing: {} {} {:?}", shell, shell_flag(), command);

    let mut child = cmd.spawn().map_err(|_| RigupError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    // Drain both pipes on their own threads so a chatty command cannot
    // block on a full pipe while we wait for it.
    let stdout = PipeReader::spawn(child.stdout.take());
    let stderr = PipeReader::spawn(child.stderr.take());

    let status = match options.timeout {
        Some(timeout) => wait_with_timeout(&mut child, command, timeout)?,
        None => child.wait()?,
    };

    let drain_deadline = Instant::now() + DRAIN_GRACE;
    let stdout = stdout.finish(drain_deadline);
    let stderr = stderr.finish(drain_deadline);

    Ok(CommandResult {
        exit_code: status.code(),
        stdout,
        stderr,
        success: status.success(),
    })
}

/// Output collected from one pipe by a background thread.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl PipeReader {
    fn spawn<R: Read + Send + 'static>(source: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut source) = source {
                let mut chunk = [0u8; 8192];
                loop {
                    match source.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => match sink.lock() {
                            Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                            Err(_) => break,
                        },
                    }
                }
            }
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Wait for end-of-file until `deadline`, then return what was read.
    fn finish(self, deadline: Instant) -> String {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if self.done.recv_timeout(remaining).is_err() {
            tracing::debug!("Output pipe still open after command exit; not waiting");
        }
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

fn wait_with_timeout(
    child: &mut Child,
    command: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            tracing::warn!("Command exceeded {}s, killing: {}", timeout.as_secs(), command);
            let _ = child.kill();
            let _ = child.wait();
            return Err(RigupError::CommandTimedOut {
                command: command.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Detect the shell used to run commands.
fn detect_shell() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        "/bin/sh".to_string()
    }
}

/// Get the flag to pass commands to the shell.
///
/// Uses a login shell on Unix so that PATH changes written to the user's
/// profile by an installer are visible when the requirement is re-probed.
fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-lc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let result = execute("echo hello", &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
        assert_eq!(result.first_line(), Some("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("exit 3", &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn first_line_falls_back_to_stderr() {
        let cmd = if cfg!(target_os = "windows") {
            "echo oops 1>&2"
        } else {
            "echo oops >&2"
        };
        let result = execute(cmd, &CommandOptions::default()).unwrap();
        assert_eq!(result.first_line(), Some("oops"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_kills_command_after_timeout() {
        let options = CommandOptions::with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let err = execute("sleep 5", &options).unwrap_err();

        assert!(matches!(err, RigupError::CommandTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn execute_within_timeout_succeeds() {
        let options = CommandOptions::with_timeout(Duration::from_secs(10));
        assert!(execute("echo quick", &options).unwrap().success);
    }

    #[cfg(unix)]
    #[test]
    fn background_process_does_not_hold_up_result() {
        let options = CommandOptions::with_timeout(Duration::from_millis(500));
        let started = Instant::now();
        let result = execute("sleep 4 & echo started", &options).unwrap();

        assert!(result.success);
        assert_eq!(result.first_line(), Some("started"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn background_process_without_timeout_is_not_waited_for() {
        let started = Instant::now();
        let result = execute("sleep 4 & exit 0", &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn large_output_is_collected() {
        let cmd = if cfg!(target_os = "windows") {
            "for /L %i in (1,1,2000) do @echo line %i"
        } else {
            "i=0; while [ $i -lt 2000 ]; do echo line $i; i=$((i+1)); done"
        };
        let result = execute(cmd, &CommandOptions::with_timeout(Duration::from_secs(30))).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.lines().count(), 2000);
    }
}
