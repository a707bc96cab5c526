//! Subprocess execution utilities.
//!
//! External tools (pkg-config, apt-get, uname) are invoked through
//! [`ProcessBuilder`]. Package queries run under a deadline so that a hung
//! tool surfaces as a reported error instead of blocking resolution forever.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Outcome of a deadline-bounded execution.
#[derive(Debug)]
pub enum TimedOutput {
    /// The child exited before the deadline.
    Completed(Output),
    /// The deadline passed; the child was killed.
    TimedOut,
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command, capturing output, and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let output = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;
        Ok(output)
    }

    /// Execute with a deadline, killing the child if it has not exited in time.
    ///
    /// Stdout and stderr are drained on background threads so a chatty child
    /// cannot deadlock on a full pipe while we poll for exit.
    pub fn exec_with_timeout(&self, timeout: Duration) -> Result<TimedOutput> {
        let mut child = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    kill_and_reap(&mut child);
                    tracing::warn!(
                        "`{}` exceeded {:?} deadline, killed",
                        self.display_command(),
                        timeout
                    );
                    return Ok(TimedOutput::TimedOut);
                }
                None => std::thread::sleep(Duration::from_millis(10)),
            }
        };

        Ok(TimedOutput::Completed(Output {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        }))
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builder() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.trim() == "hello" || stdout.contains("hello"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("pkg-config").args(["--exists", "jack"]);

        assert_eq!(pb.display_command(), "pkg-config --exists jack");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_timeout_completes() {
        let out = ProcessBuilder::new("true")
            .exec_with_timeout(Duration::from_secs(5))
            .unwrap();
        assert!(matches!(out, TimedOutput::Completed(o) if o.status.success()));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_timeout_kills_hung_child() {
        let out = ProcessBuilder::new("sleep")
            .arg("30")
            .exec_with_timeout(Duration::from_millis(100))
            .unwrap();
        assert!(matches!(out, TimedOutput::TimedOut));
    }
}
