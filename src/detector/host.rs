use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::detector::DetectorError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of one finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout and stderr joined, for error reports.
    pub fn combined(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (true, _) => err.to_string(),
            (false, true) => out.to_string(),
            (false, false) => format!("{}\n{}", out, err),
        }
    }
}

impl From<&std::process::Output> for CommandOutput {
    fn from(output: &std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

pub trait CommandRunner: Send + Sync {
    fn has_program(&self, program: &str) -> bool;
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, DetectorError>;
}

/// Runs real processes: PATH lookups through `which`, execution through `duct`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, DetectorError> {
        debug!(program, ?args, "spawning");
        let spawn_err = |source| DetectorError::Spawn {
            program: program.to_string(),
            source,
        };

        let handle = duct::cmd(program, args.iter().copied())
            .env("LC_ALL", "C")
            .stdin_null()
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .start()
            .map_err(spawn_err)?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(output) = handle.try_wait().map_err(spawn_err)? {
                return Ok(CommandOutput::from(output));
            }
            if Instant::now() >= deadline {
                let _ = handle.kill();
                return Err(DetectorError::TimedOut {
                    program: program.to_string(),
                    secs: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// What detectors talk to: a runner plus the elevation helper and timeouts.
#[derive(Clone)]
pub struct Host {
    runner: Arc<dyn CommandRunner>,
    elevate: Vec<String>,
    list_timeout: Duration,
    remove_timeout: Duration,
}

impl Host {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        elevate: &str,
        list_timeout: Duration,
        remove_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            elevate: elevate.split_whitespace().map(str::to_string).collect(),
            list_timeout,
            remove_timeout,
        }
    }

    pub fn has(&self, program: &str) -> bool {
        self.runner.has_program(program)
    }

    /// Run a listing command. A non-zero exit is a hard failure.
    pub fn query(&self, program: &str, args: &[&str]) -> Result<String, DetectorError> {
        let output = self.runner.run(program, args, self.list_timeout)?;
        if !output.success {
            return Err(DetectorError::failed(program, &output));
        }
        Ok(output.stdout)
    }

    /// Run a detail lookup whose failure only means "no extra fields".
    pub fn query_lenient(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.query(program, args) {
            Ok(stdout) => Some(stdout),
            Err(e) => {
                debug!(program, ?args, error = %e, "detail lookup failed");
                None
            }
        }
    }

    /// Run a removal command, wrapped in the elevation helper when `elevated`.
    pub fn remove(&self, elevated: bool, program: &str, args: &[&str]) -> Result<(), DetectorError> {
        let mut argv: Vec<&str> = Vec::with_capacity(self.elevate.len() + args.len() + 1);
        if elevated {
            argv.extend(self.elevate.iter().map(String::as_str));
        }
        argv.push(program);
        argv.extend_from_slice(args);

        info!(command = %argv.join(" "), "removing package");
        let output = self.runner.run(argv[0], &argv[1..], self.remove_timeout)?;
        if !output.success {
            return Err(DetectorError::failed(argv[0], &output));
        }
        Ok(())
    }
}
