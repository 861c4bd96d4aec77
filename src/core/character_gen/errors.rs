//! Character Generation Error Types
//!
//! Template loading and export failures. Generator failures live in
//! [`crate::core::llm::GeneratorError`] because they never escape the forge.

use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Template Errors
// ============================================================================

/// Errors that can occur when loading a template set.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Failed to read the template file.
    #[error("Failed to load templates from {}: {source}", .path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse template YAML.
    #[error("Failed to parse templates in {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A category has no options to draw from.
    #[error("Template category '{category}' is empty")]
    EmptyCategory { category: &'static str },

    /// Two distinct positive traits are drawn per character.
    #[error("At least 2 positive traits are required, found {found}")]
    NotEnoughPositiveTraits { found: usize },
}

impl TemplateError {
    /// Create a LoadFailed error.
    pub fn load_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LoadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseFailed error.
    pub fn parse_failed(path: impl Into<PathBuf>, source: serde_yaml_ng::Error) -> Self {
        Self::ParseFailed {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// Export Errors
// ============================================================================

/// Errors that can occur when writing or reading a character file.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure (permission denied, missing directory, ...).
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("Invalid character JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    /// Create an Io error.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a Json error.
    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}
