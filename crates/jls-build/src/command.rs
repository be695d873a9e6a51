//! Subprocess execution for build-tool CLIs, with bounded output capture and
//! an optional wall-clock timeout. There is no real process-tree killer
//! here (that needs platform-specific process-group plumbing); a build tool
//! that spawns long-lived children of its own is out of scope.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput>;
}

#[derive(Debug, Clone)]
pub struct DefaultCommandRunner {
    pub timeout: Option<Duration>,
}

impl Default for DefaultCommandRunner {
    fn default() -> Self {
        Self { timeout: Some(Duration::from_secs(15 * 60)) }
    }
}

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput> {
        let start = Instant::now();
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()?;

        let timeout = self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                let output = child.wait_with_output()?;
                return Ok(CommandOutput {
                    status,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    timed_out: false,
                });
            }
            if let Some(timeout) = timeout {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let output = child.wait_with_output()?;
                    return Ok(CommandOutput {
                        status: output.status,
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                        timed_out: true,
                    });
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

pub fn format_command(program: &Path, args: &[String]) -> String {
    let mut out = program.display().to_string();
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_command_joins_program_and_args() {
        let cmd = format_command(Path::new("mvn"), &["-q".into(), "compile".into()]);
        assert_eq!(cmd, "mvn -q compile");
    }

    #[test]
    fn runs_true_and_captures_zero_exit_status() {
        let runner = DefaultCommandRunner { timeout: Some(Duration::from_secs(5)) };
        let result = runner.run(Path::new("."), Path::new("true"), &[]).unwrap();
        assert!(result.status.success());
        assert!(!result.timed_out);
    }

    #[test]
    fn timeout_kills_a_sleeping_child() {
        let runner = DefaultCommandRunner { timeout: Some(Duration::from_millis(100)) };
        let result = runner.run(Path::new("."), Path::new("sleep"), &["5".into()]).unwrap();
        assert!(result.timed_out);
    }
}
