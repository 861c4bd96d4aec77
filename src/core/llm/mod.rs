//! External text generation
//!
//! Biographies can optionally be written by a locally installed LLM runner.
//! The runner is an out-of-process collaborator: it either answers within a
//! deadline or it doesn't, and both outcomes are ordinary. Callers decide what
//! to do with a failure; nothing in here retries.

pub mod cli;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use cli::{CliGenerator, CliGeneratorBuilder, DEFAULT_MODEL, DEFAULT_PROGRAM, DEFAULT_TIMEOUT_SECS};

/// Result type for text generation.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Why a text generator did not produce usable prose.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The executable could not be located or spawned.
    #[error("Generator executable '{program}' not found")]
    NotFound { program: String },

    /// The call did not finish before the deadline.
    #[error("Generator timed out after {}s", .timeout.as_secs_f32())]
    Timeout { timeout: Duration },

    /// The process exited unsuccessfully.
    #[error("Generator exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// The process succeeded but printed nothing useful.
    #[error("Generator returned empty output")]
    EmptyOutput,

    /// Any other I/O failure while talking to the process.
    #[error("Generator I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Create a NotFound error.
    pub fn not_found(program: impl Into<String>) -> Self {
        Self::NotFound {
            program: program.into(),
        }
    }

    /// Create an Io error with a short description of what was attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the tool itself is missing, as opposed to a single bad call.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// An out-of-process capability that turns a prompt into prose.
///
/// Implementations block until they have an answer or their own deadline
/// passes.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator {
    /// Human-readable identifier for logs and notices.
    fn name(&self) -> String;

    /// Run the prompt and return the trimmed output.
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Resolve an executable on `PATH` (or accept an explicit path as-is).
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
