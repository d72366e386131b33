//! Command id code generation for protoc-gen-cmd
//!
//! This crate turns resolved protobuf descriptors plus a command table into
//! target-language source:
//! - one `<File>.cmd.*` per proto file, adding `CmdId`/`CmdName` accessors
//!   to every registered message
//! - one aggregator file that registers every augmented type with the
//!   runtime command registry at startup
//!
//! Target languages plug in through [`Generator`] and are looked up by the
//! `lang` parameter in a [`GeneratorRegistry`]. Built in: [`csharp`] and [`go`].

pub mod csharp;
mod driver;
mod flags;
pub mod go;
mod messages;
mod namespace;
mod registry;
mod templates;
mod writer;

pub use driver::{build_response, Driver};
pub use messages::{collect_command_messages, CommandMessage, Traversal};
pub use namespace::{file_name_base, go_import_path, resolve_go_package, resolve_namespace};
pub use registry::GeneratorRegistry;
pub use writer::CodeWriter;

use prost_reflect::FileDescriptor;
use protoc_gen_cmd_common::{
    CommandTable, GeneratedFile, GeneratorError, GeneratorParameters, Result,
};
use std::collections::HashMap;

/// Everything a generator needs for one run
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Requested files, resolved and in request order
    pub files: Vec<FileDescriptor>,
    pub table: CommandTable,
}

/// A target-language code generator
///
/// A fresh instance is created for every invocation, so implementations may
/// accumulate state across the files of one run.
#[cfg_attr(test, mockall::automock)]
pub trait Generator {
    /// Apply generator-specific parameters
    ///
    /// `lang` and `config` have already been removed. Any key the generator
    /// does not recognize must be rejected with `GeneratorError::Flag`.
    fn configure(&mut self, params: &GeneratorParameters) -> Result<()>;

    /// Produce the output files for the whole request
    fn generate(&mut self, context: &GenerationContext) -> Result<Vec<GeneratedFile>>;
}

/// Output file names claimed during one run, with what produced each
///
/// protoc rejects a response that writes the same file twice, so a clash is
/// reported here with both sources named.
#[derive(Debug, Default)]
pub(crate) struct OutputNames {
    sources: HashMap<String, String>,
}

impl OutputNames {
    pub(crate) fn claim(&mut self, output: &str, source: &str) -> Result<()> {
        if let Some(previous) = self.sources.get(output) {
            return Err(GeneratorError::Generation(format!(
                "{} and {} would both generate {}",
                previous, source, output
            )));
        }
        self.sources.insert(output.to_string(), source.to_string());
        Ok(())
    }
}
