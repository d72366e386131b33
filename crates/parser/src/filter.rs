//! Selects and resolves the files protoc asked us to generate

use prost_reflect::{DescriptorPool, FileDescriptor};
use prost_types::compiler::CodeGeneratorRequest;
use protoc_gen_cmd_common::{GeneratorError, Result};
use std::collections::HashSet;

/// Resolves `file_to_generate` against the request's full descriptor set
///
/// Files are added to the pool in request order, which protoc guarantees is
/// topological. Any file that fails to resolve aborts the whole run.
pub struct DescriptorFilter {
    pool: DescriptorPool,
    files: Vec<FileDescriptor>,
}

impl DescriptorFilter {
    /// Build the resolution pool and select the requested files
    ///
    /// # Example
    /// ```rust,ignore
    /// let filter = DescriptorFilter::from_request(&request)?;
    /// for file in filter.files() {
    ///     println!("{}", file.name());
    /// }
    /// ```
    pub fn from_request(request: &CodeGeneratorRequest) -> Result<Self> {
        let requested: HashSet<&str> = request
            .file_to_generate
            .iter()
            .map(String::as_str)
            .collect();

        let mut pool = DescriptorPool::new();
        let mut selected = Vec::new();

        for proto in &request.proto_file {
            let name = proto.name().to_string();

            pool.add_file_descriptor_proto(proto.clone())
                .map_err(|e| GeneratorError::Descriptor {
                    file: name.clone(),
                    reason: e.to_string(),
                })?;

            if requested.contains(name.as_str()) {
                selected.push(name);
            }
        }

        let mut files = Vec::with_capacity(selected.len());
        for name in &selected {
            let file = pool
                .get_file_by_name(name)
                .ok_or_else(|| GeneratorError::Descriptor {
                    file: name.clone(),
                    reason: "file was not registered in the descriptor pool".to_string(),
                })?;
            files.push(file);
        }

        if let Some(missing) = request
            .file_to_generate
            .iter()
            .find(|name| !selected.contains(name))
        {
            return Err(GeneratorError::Descriptor {
                file: missing.clone(),
                reason: "requested file is missing from proto_file".to_string(),
            });
        }

        tracing::debug!(
            loaded = request.proto_file.len(),
            requested = files.len(),
            "resolved descriptors"
        );

        Ok(Self { pool, files })
    }

    /// Resolved descriptors for the requested files, in request order
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn into_files(self) -> Vec<FileDescriptor> {
        self.files
    }

    /// The pool holding every loaded file, including unrequested imports
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}
