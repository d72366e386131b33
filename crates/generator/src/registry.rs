//! Language key to generator lookup

use crate::{csharp, go, Generator};
use protoc_gen_cmd_common::{GeneratorError, Result};
use std::collections::BTreeMap;

type GeneratorFactory = Box<dyn Fn() -> Box<dyn Generator> + Send + Sync>;

/// Constructors for every available target language, keyed by `lang`
///
/// Built once at startup and passed by reference to the [`Driver`](crate::Driver).
#[derive(Default)]
pub struct GeneratorRegistry {
    factories: BTreeMap<String, GeneratorFactory>,
}

impl GeneratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every generator shipped with this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        csharp::register(&mut registry);
        go::register(&mut registry);
        registry
    }

    /// Register a generator constructor under `lang`
    ///
    /// Registering the same key twice replaces the earlier constructor.
    pub fn register<F>(&mut self, lang: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Generator> + Send + Sync + 'static,
    {
        let lang = lang.into();
        if self.factories.insert(lang.clone(), Box::new(factory)).is_some() {
            tracing::warn!(lang = %lang, "generator registered twice, keeping the latest");
        }
    }

    /// Construct a fresh generator for `lang`
    pub fn create(&self, lang: &str) -> Result<Box<dyn Generator>> {
        self.factories
            .get(lang)
            .map(|factory| factory())
            .ok_or_else(|| GeneratorError::UnknownLanguage(lang.to_string()))
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.factories.contains_key(lang)
    }

    /// Registered language keys, sorted
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("languages", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
