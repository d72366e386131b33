//! Protoc plugin input handling
//!
//! This crate reads the `CodeGeneratorRequest` protoc writes to a plugin's
//! stdin, writes the `CodeGeneratorResponse` back, and resolves the files
//! protoc asked us to generate into reflective descriptors.
//!
//! ## Resolution Strategy
//!
//! protoc sends every file in the transitive import graph, dependencies
//! first, but only names a subset in `file_to_generate`. All of them are
//! added to one `DescriptorPool` in order, so a requested file can reference
//! types from imports that will never be generated themselves.

mod filter;
mod request;

pub use filter::DescriptorFilter;
pub use request::{decode_request, encode_response, read_request, write_response};
