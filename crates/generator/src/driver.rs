//! One plugin invocation, from request to response

use crate::{GenerationContext, GeneratorRegistry};
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};
use protoc_gen_cmd_common::{
    CommandTable, GeneratedFile, GeneratorError, GeneratorParameters, Result, DEFAULT_CONFIG_PATH,
};
use protoc_gen_cmd_parser::DescriptorFilter;
use std::path::Path;

/// Runs a single generation pass against a registry of generators
///
/// Every error is fatal: a failed run produces no files at all.
pub struct Driver<'a> {
    registry: &'a GeneratorRegistry,
}

impl<'a> Driver<'a> {
    pub fn new(registry: &'a GeneratorRegistry) -> Self {
        Self { registry }
    }

    /// Answer a request, loading the command table named by `config`
    pub fn respond(&self, request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
        let mut params = GeneratorParameters::parse(request.parameter())?;
        let config_path = params
            .take("config")
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let table = CommandTable::load(Path::new(&config_path))?;

        self.respond_with_table(request, params, table)
    }

    /// Answer a request with an already loaded command table
    ///
    /// `params` must no longer contain `config`; `lang` is consumed here.
    pub fn respond_with_table(
        &self,
        request: &CodeGeneratorRequest,
        mut params: GeneratorParameters,
        table: CommandTable,
    ) -> Result<CodeGeneratorResponse> {
        let lang = params
            .take("lang")
            .ok_or_else(|| GeneratorError::Config("missing required parameter 'lang'".to_string()))?;

        let files = DescriptorFilter::from_request(request)?.into_files();

        let mut generator = self.registry.create(&lang)?;
        generator.configure(&params)?;

        tracing::debug!(lang = %lang, files = files.len(), commands = table.len(), "running generator");
        let generated = generator.generate(&GenerationContext { files, table })?;

        Ok(build_response(generated))
    }
}

/// Wrap generated files in a response, preserving their order
pub fn build_response(files: Vec<GeneratedFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        file: files
            .into_iter()
            .map(|f| code_generator_response::File {
                name: Some(f.name),
                content: Some(f.content),
                ..Default::default()
            })
            .collect(),
        supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
        ..Default::default()
    }
}
