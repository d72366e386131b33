//! Go generator
//!
//! For every registered message, emits a command id constant plus `CmdId()`
//! and `CmdName()` methods next to the struct produced by `protoc-gen-go`:
//!
//! ```go
//! const (
//! 	LoginReq_CmdId uint16 = 1001
//! )
//!
//! func (*LoginReq) CmdId() uint16   { return LoginReq_CmdId }
//! func (*LoginReq) CmdName() string { return "LoginReq" }
//! ```
//!
//! Nested messages use protoc-gen-go struct names (`LoginRsp_TransformInfo`).
//! Every output Go package also gets one `<init_file_name>.go` whose `init()`
//! registers its types with the runtime package.
//!
//! ## Flags
//! - `paths` (default `import`): `import` writes under the `go_package`
//!   import path like protoc-gen-go; `source_relative` writes next to the
//!   `.proto` file
//! - `init_file_name` (default `cmd_init`): registration file name, no extension
//! - `runtime_import` (default `github.com/stalomeow/protocmd`): package
//!   providing `CmdMessage` and `Register`
//! - `descend_unregistered` (default `false`): also look for registered
//!   messages nested inside unregistered ones

use crate::flags;
use crate::messages::{collect_command_messages, CommandMessage, Traversal};
use crate::namespace::{go_import_path, resolve_go_package};
use crate::registry::GeneratorRegistry;
use crate::templates::{self, GO_AGGREGATOR, GO_MESSAGE};
use crate::{GenerationContext, Generator, OutputNames};
use prost_reflect::FileDescriptor;
use protoc_gen_cmd_common::{
    go_camel_case, go_sanitized, CommandTable, EmittedType, GeneratedFile, GeneratorError,
    GeneratorParameters, Result,
};
use tera::{Context, Tera};

/// Language key for `lang=go`
pub const LANG: &str = "go";

const DEFAULT_INIT_FILE_NAME: &str = "cmd_init";
const DEFAULT_RUNTIME_IMPORT: &str = "github.com/stalomeow/protocmd";

/// Add the Go generator to `registry`
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(LANG, || Box::new(GoGenerator::default()));
}

/// Where output files are placed, mirroring protoc-gen-go's `paths` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    #[default]
    Import,
    SourceRelative,
}

/// Types emitted into one output directory, which is one Go package
#[derive(Debug)]
struct PackageGroup {
    dir: String,
    package: String,
    types: Vec<EmittedType>,
}

/// Generates command id methods and per-package registration files
#[derive(Debug)]
pub struct GoGenerator {
    init_file_name: String,
    runtime_import: String,
    paths: PathMode,
    traversal: Traversal,
    packages: Vec<PackageGroup>,
}

impl Default for GoGenerator {
    fn default() -> Self {
        Self {
            init_file_name: DEFAULT_INIT_FILE_NAME.to_string(),
            runtime_import: DEFAULT_RUNTIME_IMPORT.to_string(),
            paths: PathMode::default(),
            traversal: Traversal::default(),
            packages: Vec::new(),
        }
    }
}

impl Generator for GoGenerator {
    fn configure(&mut self, params: &GeneratorParameters) -> Result<()> {
        for (key, value) in params.iter() {
            match key {
                "init_file_name" => self.init_file_name = flags::non_empty(key, value)?,
                "runtime_import" => self.runtime_import = flags::non_empty(key, value)?,
                "paths" => {
                    self.paths = match value {
                        "import" => PathMode::Import,
                        "source_relative" => PathMode::SourceRelative,
                        other => {
                            return Err(GeneratorError::Flag {
                                name: key.to_string(),
                                reason: format!(
                                    "expected import or source_relative, got {:?}",
                                    other
                                ),
                            })
                        }
                    };
                }
                "descend_unregistered" => self.traversal = flags::traversal(key, value)?,
                _ => return Err(flags::unrecognized(key, LANG)),
            }
        }
        Ok(())
    }

    fn generate(&mut self, context: &GenerationContext) -> Result<Vec<GeneratedFile>> {
        let tera = templates::load_templates()?;
        self.packages.clear();

        let mut outputs = OutputNames::default();
        let mut files = Vec::new();
        for file in &context.files {
            if let Some(generated) = self.generate_file(&tera, file, &context.table)? {
                outputs.claim(&generated.name, file.name())?;
                files.push(generated);
            }
        }

        for group in &self.packages {
            let aggregator = self.generate_aggregator(&tera, group)?;
            outputs.claim(&aggregator.name, "init_file_name")?;
            files.push(aggregator);
        }

        Ok(files)
    }
}

impl GoGenerator {
    /// Generate `<name>.cmd.go`, or nothing if no message is registered
    fn generate_file(
        &mut self,
        tera: &Tera,
        file: &FileDescriptor,
        table: &CommandTable,
    ) -> Result<Option<GeneratedFile>> {
        let messages = collect_command_messages(file.messages(), table, self.traversal);

        let mut types = Vec::new();
        flatten(&messages, file.package_name(), &mut types);
        if types.is_empty() {
            tracing::debug!(file = file.name(), "no registered messages, skipping");
            return Ok(None);
        }

        let package = resolve_go_package(file);
        let name = self.output_path(file);
        self.add_to_package(parent_dir(&name), &package, &types, file.name())?;

        let mut ctx = Context::new();
        ctx.insert("source", file.name());
        ctx.insert("package", &package);
        ctx.insert("types", &types);
        let content = templates::render(tera, GO_MESSAGE, &mut ctx)?;

        tracing::debug!(file = file.name(), output = %name, types = types.len(), "generated command file");
        Ok(Some(GeneratedFile::new(name, content)))
    }

    fn output_path(&self, file: &FileDescriptor) -> String {
        let path = file.name();
        let stem = path.strip_suffix(".proto").unwrap_or(path);

        match (self.paths, go_import_path(file)) {
            (PathMode::Import, Some(import_path)) => {
                let base = stem.rsplit('/').next().unwrap_or(stem);
                format!("{}/{}.cmd.go", import_path, base)
            }
            _ => format!("{}.cmd.go", stem),
        }
    }

    fn add_to_package(
        &mut self,
        dir: &str,
        package: &str,
        types: &[EmittedType],
        source: &str,
    ) -> Result<()> {
        if let Some(group) = self.packages.iter_mut().find(|group| group.dir == dir) {
            if group.package != package {
                return Err(GeneratorError::Generation(format!(
                    "{} declares Go package {} but {:?} already holds package {}",
                    source, package, dir, group.package
                )));
            }
            group.types.extend_from_slice(types);
            return Ok(());
        }

        self.packages.push(PackageGroup {
            dir: dir.to_string(),
            package: package.to_string(),
            types: types.to_vec(),
        });
        Ok(())
    }

    /// Generate `<dir>/<init_file_name>.go` registering every type of `group`
    fn generate_aggregator(&self, tera: &Tera, group: &PackageGroup) -> Result<GeneratedFile> {
        let last_element = self.runtime_import.rsplit('/').next().unwrap_or(&self.runtime_import);
        let runtime_alias = go_sanitized(last_element);

        let mut ctx = Context::new();
        ctx.insert("package", &group.package);
        ctx.insert("runtime_alias", &runtime_alias);
        ctx.insert("runtime_import", &self.runtime_import);
        ctx.insert("types", &group.types);
        let content = templates::render(tera, GO_AGGREGATOR, &mut ctx)?;

        let name = if group.dir.is_empty() {
            format!("{}.go", self.init_file_name)
        } else {
            format!("{}/{}.go", group.dir, self.init_file_name)
        };
        tracing::debug!(output = %name, types = group.types.len(), "generated registration file");
        Ok(GeneratedFile::new(name, content))
    }
}

/// Registered messages in declaration order, named as Go structs
fn flatten(messages: &[CommandMessage], proto_package: &str, out: &mut Vec<EmittedType>) {
    for message in messages {
        if let Some(cmd_id) = message.cmd_id {
            out.push(EmittedType {
                full_name: go_type_name(&message.full_name, proto_package),
                name: message.name.clone(),
                cmd_id,
            });
        }
        flatten(&message.nested, proto_package, out);
    }
}

/// protoc-gen-go struct name for a message full name
fn go_type_name(full_name: &str, proto_package: &str) -> String {
    let relative = if proto_package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(proto_package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    go_camel_case(relative)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}
