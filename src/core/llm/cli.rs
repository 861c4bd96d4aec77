//! Command-line LLM runner
//!
//! Drives a local runner such as `ollama` as `<program> run <model> <prompt>`,
//! capturing stdout. Each call gets its own wall-clock deadline; a child that
//! overruns it is killed and reported as [`GeneratorError::Timeout`].
//!
//! ```rust,no_run
//! use character_forge::core::llm::{CliGenerator, TextGenerator};
//!
//! let generator = CliGenerator::builder()
//!     .model("mistral")
//!     .timeout_secs(45)
//!     .build();
//!
//! if generator.is_available() {
//!     let prose = generator.generate("Describe a tavern in one line.");
//! }
//! ```

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use super::{GeneratorError, Result, TextGenerator};

/// Default runner executable.
pub const DEFAULT_PROGRAM: &str = "ollama";

/// Default model to request.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default timeout in seconds for a single generation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for the `--version` probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Subprocess-backed text generator.
#[derive(Debug, Clone)]
pub struct CliGenerator {
    program: String,
    model: String,
    timeout: Duration,
}

/// Builder for CliGenerator.
#[derive(Debug, Default)]
pub struct CliGeneratorBuilder {
    program: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl CliGeneratorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the executable name or path.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Set the model passed to `run`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the timeout in whole seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Set the timeout precisely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the generator.
    pub fn build(self) -> CliGenerator {
        CliGenerator {
            program: self.program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl CliGenerator {
    /// Create a generator with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new builder.
    pub fn builder() -> CliGeneratorBuilder {
        CliGeneratorBuilder::new()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same runner and deadline, different model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }

    /// Check whether the runner is installed and answers `--version`.
    pub fn is_available(&self) -> bool {
        self.version().is_some()
    }

    /// Version string reported by the runner, if it is installed.
    pub fn version(&self) -> Option<String> {
        if super::locate(&self.program).is_none() {
            debug!(program = %self.program, "runner not found on PATH");
            return None;
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("--version");

        match run_with_deadline(&self.program, cmd, PROBE_TIMEOUT) {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                info!(program = %self.program, version = %version, "runner available");
                Some(version)
            }
            Ok(output) => {
                debug!(
                    program = %self.program,
                    exit_code = ?output.status.code(),
                    "runner version probe failed"
                );
                None
            }
            Err(e) => {
                debug!(program = %self.program, error = %e, "runner version probe failed");
                None
            }
        }
    }

    fn build_args<'a>(&'a self, prompt: &'a str) -> [&'a str; 3] {
        ["run", self.model.as_str(), prompt]
    }
}

impl Default for CliGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGenerator for CliGenerator {
    fn name(&self) -> String {
        format!("{} ({})", self.program, self.model)
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            program = %self.program,
            model = %self.model,
            prompt_len = prompt.len(),
            "executing runner"
        );

        let start = Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(self.build_args(prompt));

        let output = run_with_deadline(&self.program, cmd, self.timeout)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                exit_code = ?output.status.code(),
                stderr = %stderr,
                latency_ms,
                "runner failed"
            );
            return Err(GeneratorError::Failed {
                code: output.status.code(),
                stderr,
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            warn!(latency_ms, "runner returned empty output");
            return Err(GeneratorError::EmptyOutput);
        }

        info!(response_len = text.len(), latency_ms, "received runner output");
        Ok(text)
    }
}

/// Spawn `cmd` and wait for it on a current-thread runtime, killing the child
/// if `deadline` passes first.
fn run_with_deadline(
    program: &str,
    mut cmd: Command,
    deadline: Duration,
) -> Result<std::process::Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let runtime = current_thread_runtime()?;

    runtime.block_on(async {
        let child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => GeneratorError::not_found(program),
            _ => GeneratorError::io(format!("spawning {program}"), e),
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| GeneratorError::io(format!("waiting on {program}"), e)),
            Err(_) => {
                warn!(program = %program, timeout_ms = deadline.as_millis() as u64, "runner timed out");
                Err(GeneratorError::Timeout { timeout: deadline })
            }
        }
    })
}

fn current_thread_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GeneratorError::io("starting runtime", e))
}
