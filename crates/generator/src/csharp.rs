//! C# generator
//!
//! For every registered message, emits a `partial class` that implements
//! `ICmdMessage` next to the class produced by `protoc --csharp_out`:
//!
//! ```csharp
//! partial class LoginReq : ICmdMessage
//! {
//!     public static ushort CmdId => 1001;
//!     ushort ICmdMessage.CmdId => 1001;
//!
//!     public static string CmdName => "LoginReq";
//!     string ICmdMessage.CmdName => "LoginReq";
//! }
//! ```
//!
//! Nested messages go inside `partial class Types`, mirroring the layout
//! protoc uses for nested types. After all files, one `<init_class_name>.cs`
//! registers every augmented type with `Google.Protobuf.CmdMessageUtility`.
//!
//! ## Flags
//! - `init_class_name` (default `CmdMessageLoader`): aggregator class name
//! - `init_class_ns` (default none): namespace wrapping the aggregator class
//! - `init_attribute` (default `UnityEngine.RuntimeInitializeOnLoadMethod`):
//!   attribute that makes the runtime call the registration method at startup
//! - `descend_unregistered` (default `false`): also look for registered
//!   messages nested inside unregistered ones

use crate::flags;
use crate::messages::{collect_command_messages, CommandMessage, Traversal};
use crate::namespace::{file_name_base, resolve_namespace};
use crate::registry::GeneratorRegistry;
use crate::templates::{self, CSHARP_AGGREGATOR, CSHARP_MESSAGE};
use crate::writer::CodeWriter;
use crate::{GenerationContext, Generator, OutputNames};
use prost_reflect::FileDescriptor;
use protoc_gen_cmd_common::{
    CommandTable, EmittedType, GeneratedFile, GeneratorParameters, Result,
};
use tera::{Context, Tera};

/// Language key for `lang=csharp`
pub const LANG: &str = "csharp";

const DEFAULT_INIT_CLASS_NAME: &str = "CmdMessageLoader";
const DEFAULT_INIT_ATTRIBUTE: &str = "UnityEngine.RuntimeInitializeOnLoadMethod";

/// Add the C# generator to `registry`
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(LANG, || Box::new(CSharpGenerator::default()));
}

/// Generates `ICmdMessage` partial classes and the loader class
#[derive(Debug)]
pub struct CSharpGenerator {
    init_class_name: String,
    init_class_ns: String,
    init_attribute: String,
    traversal: Traversal,
    /// Every augmented type across all files, in discovery order
    emitted: Vec<EmittedType>,
}

impl Default for CSharpGenerator {
    fn default() -> Self {
        Self {
            init_class_name: DEFAULT_INIT_CLASS_NAME.to_string(),
            init_class_ns: String::new(),
            init_attribute: DEFAULT_INIT_ATTRIBUTE.to_string(),
            traversal: Traversal::default(),
            emitted: Vec::new(),
        }
    }
}

impl Generator for CSharpGenerator {
    fn configure(&mut self, params: &GeneratorParameters) -> Result<()> {
        for (key, value) in params.iter() {
            match key {
                "init_class_name" => self.init_class_name = flags::non_empty(key, value)?,
                "init_class_ns" => self.init_class_ns = value.to_string(),
                "init_attribute" => self.init_attribute = flags::non_empty(key, value)?,
                "descend_unregistered" => self.traversal = flags::traversal(key, value)?,
                _ => return Err(flags::unrecognized(key, LANG)),
            }
        }
        Ok(())
    }

    fn generate(&mut self, context: &GenerationContext) -> Result<Vec<GeneratedFile>> {
        let tera = templates::load_templates()?;
        self.emitted.clear();

        let mut outputs = OutputNames::default();
        let mut files = Vec::new();
        for file in &context.files {
            if let Some(generated) = self.generate_file(&tera, file, &context.table)? {
                outputs.claim(&generated.name, file.name())?;
                files.push(generated);
            }
        }

        if let Some(aggregator) = self.generate_aggregator(&tera)? {
            outputs.claim(&aggregator.name, "init_class_name")?;
            files.push(aggregator);
        }

        Ok(files)
    }
}

impl CSharpGenerator {
    /// Types augmented by the last `generate` call, in registration order
    pub fn emitted(&self) -> &[EmittedType] {
        &self.emitted
    }

    /// Generate `<FileName>.cmd.cs`, or nothing if no message is registered
    fn generate_file(
        &mut self,
        tera: &Tera,
        file: &FileDescriptor,
        table: &CommandTable,
    ) -> Result<Option<GeneratedFile>> {
        let namespace = resolve_namespace(file);
        let messages = collect_command_messages(file.messages(), table, self.traversal);

        let mut writer = CodeWriter::new();
        if !namespace.is_empty() {
            writer.indent();
        }

        let count = self.write_messages(&mut writer, &messages, &namespace);
        if count == 0 {
            tracing::debug!(file = file.name(), "no registered messages, skipping");
            return Ok(None);
        }

        let mut ctx = Context::new();
        ctx.insert("source", file.name());
        ctx.insert("namespace", &namespace);
        ctx.insert("body", &writer.into_string());
        let content = templates::render(tera, CSHARP_MESSAGE, &mut ctx)?;

        let name = format!("{}.cmd.cs", file_name_base(file));
        tracing::debug!(file = file.name(), output = %name, types = count, "generated command file");
        Ok(Some(GeneratedFile::new(name, content)))
    }

    /// Write the partial classes for `messages` declared in `scope`
    ///
    /// Returns how many types received accessors.
    fn write_messages(
        &mut self,
        writer: &mut CodeWriter,
        messages: &[CommandMessage],
        scope: &str,
    ) -> usize {
        let mut count = 0;

        for (i, message) in messages.iter().enumerate() {
            if i > 0 {
                writer.blank_line();
            }

            let type_name = qualify(scope, &message.name);

            match message.cmd_id {
                Some(cmd_id) => {
                    count += 1;
                    self.emitted.push(EmittedType {
                        full_name: type_name.clone(),
                        name: message.name.clone(),
                        cmd_id,
                    });

                    writer.line(format!("partial class {} : ICmdMessage", message.name));
                    writer.open_brace();
                    writer.line(format!("public static ushort CmdId => {};", cmd_id));
                    writer.line(format!("ushort ICmdMessage.CmdId => {};", cmd_id));
                    writer.blank_line();
                    writer.line(format!("public static string CmdName => \"{}\";", message.name));
                    writer.line(format!("string ICmdMessage.CmdName => \"{}\";", message.name));
                }
                None => {
                    writer.line(format!("partial class {}", message.name));
                    writer.open_brace();
                }
            }

            if !message.nested.is_empty() {
                if message.cmd_id.is_some() {
                    writer.blank_line();
                }
                writer.line("partial class Types");
                writer.open_brace();
                count += self.write_messages(writer, &message.nested, &format!("{}.Types", type_name));
                writer.close_brace();
            }

            writer.close_brace();
        }

        count
    }

    /// Generate `<init_class_name>.cs`, or nothing if no type was emitted
    fn generate_aggregator(&self, tera: &Tera) -> Result<Option<GeneratedFile>> {
        if self.emitted.is_empty() {
            return Ok(None);
        }

        let pad = if self.init_class_ns.is_empty() { "" } else { "    " };

        let mut ctx = Context::new();
        ctx.insert("namespace", &self.init_class_ns);
        ctx.insert("pad", pad);
        ctx.insert("class_name", &self.init_class_name);
        ctx.insert("init_attribute", &self.init_attribute);
        ctx.insert("types", &self.emitted);
        let content = templates::render(tera, CSHARP_AGGREGATOR, &mut ctx)?;

        let name = format!("{}.cs", self.init_class_name);
        tracing::debug!(output = %name, types = self.emitted.len(), "generated loader class");
        Ok(Some(GeneratedFile::new(name, content)))
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}
