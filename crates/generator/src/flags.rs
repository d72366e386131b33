//! Parsing helpers for generator-specific flags

use crate::messages::Traversal;
use protoc_gen_cmd_common::{GeneratorError, Result};

/// Error for a key the generator for `lang` does not know
pub(crate) fn unrecognized(key: &str, lang: &str) -> GeneratorError {
    GeneratorError::Flag {
        name: key.to_string(),
        reason: format!("not recognized by the {} generator", lang),
    }
}

pub(crate) fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(GeneratorError::Flag {
            name: key.to_string(),
            reason: "value must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// A bare flag (`descend_unregistered`) counts as `true`
pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(GeneratorError::Flag {
            name: key.to_string(),
            reason: format!("expected true or false, got {:?}", other),
        }),
    }
}

/// `descend_unregistered` picks the traversal
pub(crate) fn traversal(key: &str, value: &str) -> Result<Traversal> {
    Ok(if parse_bool(key, value)? {
        Traversal::AllMessages
    } else {
        Traversal::RegisteredAncestors
    })
}
