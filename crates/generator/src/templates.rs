//! Template loading and rendering

use protoc_gen_cmd_common::{GeneratorError, Result};
use tera::{Context, Tera};

pub const CSHARP_MESSAGE: &str = "message.cs";
pub const CSHARP_AGGREGATOR: &str = "aggregator.cs";
pub const GO_MESSAGE: &str = "message.go";
pub const GO_AGGREGATOR: &str = "aggregator.go";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.add_raw_template(CSHARP_MESSAGE, include_str!("../templates/message.cs.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load message.cs template: {}", e))
        })?;

    tera.add_raw_template(
        CSHARP_AGGREGATOR,
        include_str!("../templates/aggregator.cs.tera"),
    )
    .map_err(|e| {
        GeneratorError::Generation(format!("Failed to load aggregator.cs template: {}", e))
    })?;

    tera.add_raw_template(GO_MESSAGE, include_str!("../templates/message.go.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load message.go template: {}", e))
        })?;

    tera.add_raw_template(GO_AGGREGATOR, include_str!("../templates/aggregator.go.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load aggregator.go template: {}", e))
        })?;

    Ok(tera)
}

/// Render a template, stamping the generator version into the context
pub fn render(tera: &Tera, name: &str, context: &mut Context) -> Result<String> {
    context.insert("version", env!("CARGO_PKG_VERSION"));
    tera.render(name, context)
        .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))
}
