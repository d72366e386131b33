//! Common types and utilities for protoc-gen-cmd
//!
//! This crate contains the error type, the invocation configuration
//! (parameters and command table), identifier normalization, and the
//! plain data records passed between the parser, generator, and CLI.

mod config;
mod naming;

pub use config::{CommandTable, GeneratorParameters, DEFAULT_CONFIG_PATH};
pub use naming::{go_camel_case, go_sanitized, underscores_to_camel_case};

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during command generation
///
/// Every variant is fatal to the whole invocation.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("Invalid descriptor {file:?}: {reason}")]
    Descriptor { file: String, reason: String },

    #[error("Invalid flag '{name}': {reason}")]
    Flag { name: String, reason: String },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// A message type that received command identity accessors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedType {
    /// Type name as written in the target language, including namespace
    pub full_name: String,
    /// Simple message name, also used as the command name
    pub name: String,
    pub cmd_id: u16,
}

/// One output file handed back to the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
