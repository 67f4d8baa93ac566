//! External command execution utilities.
//!
//! Provides a Builder-based API for running a child process with piped
//! stdio, optional stdin data and an optional wall-clock timeout.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Simple command
//! Cmd::new("potrace").arg("--version").run()?;
//!
//! // With stdin piping and a deadline
//! let output = Cmd::new("potrace")
//!     .args(["--svg", "--output", "-", "-"])
//!     .stdin(pgm_bytes)
//!     .timeout(Duration::from_secs(60))
//!     .run()?;
//! ```

use crate::debug;
use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{ErrorKind, Read, Write},
    process::{Child, Command, ExitStatus, Output, Stdio},
    sync::OnceLock,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// How often a child with a deadline is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    stdin_data: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["potrace"]` or `["wsl", "potrace"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Kill the process if it has not exited after `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Execute the command and return its output.
    ///
    /// A non-zero exit status is an error carrying the child's stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(if self.stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        // Feed stdin and drain both pipes on their own threads so a chatty
        // child can never block on a full pipe while we wait for it.
        let writer = match (child.stdin.take(), self.stdin_data) {
            (Some(mut stdin), Some(data)) => Some(thread::spawn(move || stdin.write_all(&data))),
            _ => None,
        };
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = wait_for(&mut child, self.timeout, &name)?;

        let output = Output {
            status,
            stdout: join_reader(stdout, &name)?,
            stderr: join_reader(stderr, &name)?,
        };

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // The child may exit without consuming all of its input
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(e).with_context(|| format!("Failed to write stdin to `{name}`"));
                }
                Err(_) => bail!("stdin writer thread for `{name}` panicked"),
            }
        }

        if !output.status.success() {
            bail!(format_error(&name, &output));
        }

        log_stderr(&name, &output.stderr);
        Ok(output)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).map(|_| buf)
    })
}

fn join_reader(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    name: &str,
) -> Result<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread for `{name}` panicked"))?
        .with_context(|| format!("Failed to read output of `{name}`"))
}

/// Wait for the child, killing it once the deadline passes.
fn wait_for(child: &mut Child, timeout: Option<Duration>, name: &str) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return child
            .wait()
            .with_context(|| format!("Failed to wait for `{name}`"));
    };

    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("Failed to wait for `{name}`"))?
        {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            // Reap the child so it does not linger as a zombie.
            let _ = child.kill();
            let _ = child.wait();
            bail!(
                "Command `{name}` timed out after {:.1}s and was killed",
                limit.as_secs_f64()
            );
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Surface warnings from a successful run in verbose mode.
fn log_stderr(name: &str, stderr: &[u8]) {
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<_> = stderr
        .lines()
        .map(strip_ansi)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if !lines.is_empty() {
        debug!(name; "{}", lines.join("\n"));
    }
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let error_msg = strip_ansi(stderr.trim());

    let mut msg = format!("Command `{name}` failed with {}", output.status);
    if !error_msg.is_empty() {
        msg.push('\n');
        msg.push_str(&error_msg);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
