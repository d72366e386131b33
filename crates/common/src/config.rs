//! Invocation configuration
//!
//! Two inputs configure a run: the parameter string protoc forwards from
//! `--cmd_opt=...` (or `--cmd_out=<params>:<dir>`), and the command table,
//! a flat YAML or JSON mapping from message full name to command id.

use crate::{GeneratorError, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Table path used when the `config` parameter is absent
pub const DEFAULT_CONFIG_PATH: &str = "cmd.yaml";

/// Parameters parsed from the request's parameter string
///
/// The grammar is a comma-separated list of `key` or `key=value` tokens.
/// Only the first `=` splits a token, so values may contain `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorParameters {
    values: BTreeMap<String, String>,
}

impl GeneratorParameters {
    /// Parse a raw parameter string
    ///
    /// # Example
    /// ```
    /// use protoc_gen_cmd_common::GeneratorParameters;
    ///
    /// let params = GeneratorParameters::parse("lang=csharp,init_class_ns=Game").unwrap();
    /// assert_eq!(params.get("lang"), Some("csharp"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let mut values = BTreeMap::new();

        for token in raw.split(',') {
            if token.is_empty() {
                continue;
            }

            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, value),
                None => (token, ""),
            };

            if key.is_empty() {
                return Err(GeneratorError::Config(format!(
                    "malformed parameter {:?}: missing key before '='",
                    token
                )));
            }

            values.insert(key.to_string(), value.to_string());
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Remove a parameter so later consumers never see it
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Iterate over parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Mapping from message full name (e.g. `game.proto.LoginReq`) to command id
///
/// Ids are allowed to repeat across names; uniqueness is enforced by the
/// runtime registry that consumes the generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    ids: HashMap<String, u16>,
}

impl CommandTable {
    /// Load a table from disk
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read command table {:?}: {}", path, e))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };

        let table = parsed.map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })?;

        tracing::debug!(path = %path.display(), entries = table.len(), "loaded command table");
        table.report_shared_ids();
        Ok(table)
    }

    /// Build a table from `(full name, command id)` pairs
    ///
    /// A leading `.` on a name is dropped, the way protoc writes
    /// fully-qualified names. Two spellings of the same name are rejected.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u16)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, u16)> = entries
            .into_iter()
            .map(|(name, id)| (name.into(), id))
            .collect();
        // Deserialized maps have no stable order
        entries.sort();

        let mut spellings: HashMap<String, String> = HashMap::with_capacity(entries.len());
        let mut ids = HashMap::with_capacity(entries.len());

        for (raw, id) in entries {
            let name = raw.strip_prefix('.').unwrap_or(&raw).to_string();

            if let Some(previous) = spellings.get(&name) {
                return Err(GeneratorError::Config(format!(
                    "command table lists {:?} twice, as {:?} and {:?}",
                    name, previous, raw
                )));
            }

            spellings.insert(name.clone(), raw);
            ids.insert(name, id);
        }

        Ok(Self { ids })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let ids: Option<HashMap<String, u16>> = serde_yaml::from_str(content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse command table YAML: {}", e))
        })?;

        Self::from_entries(ids.unwrap_or_default())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let ids: HashMap<String, u16> = serde_json::from_str(content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse command table JSON: {}", e))
        })?;

        Self::from_entries(ids)
    }

    /// Look up the command id configured for a message full name
    pub fn get(&self, full_name: &str) -> Option<u16> {
        self.ids.get(full_name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Command ids assigned to more than one message, with their names sorted
    pub fn shared_ids(&self) -> BTreeMap<u16, Vec<&str>> {
        let mut by_id: BTreeMap<u16, Vec<&str>> = BTreeMap::new();
        for (name, id) in &self.ids {
            by_id.entry(*id).or_default().push(name.as_str());
        }

        by_id.retain(|_, names| names.len() > 1);
        for names in by_id.values_mut() {
            names.sort_unstable();
        }
        by_id
    }

    fn report_shared_ids(&self) {
        for (id, names) in self.shared_ids() {
            tracing::debug!(cmd_id = id, messages = ?names, "command id shared by several messages");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_parameters() {
        let params = GeneratorParameters::parse("a,b=c,d=").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some(""));
        assert_eq!(params.get("b"), Some("c"));
        assert_eq!(params.get("d"), Some(""));
    }

    #[test]
    fn test_parse_empty_parameters() {
        let params = GeneratorParameters::parse("").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let params = GeneratorParameters::parse("config=dir/a=b.yaml").unwrap();
        assert_eq!(params.get("config"), Some("dir/a=b.yaml"));
    }

    #[test]
    fn test_parse_skips_empty_tokens_and_last_value_wins() {
        let params = GeneratorParameters::parse("lang=go,,lang=csharp,").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("lang"), Some("csharp"));
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        let result = GeneratorParameters::parse("lang=csharp,=oops");
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_take_removes_parameter() {
        let mut params = GeneratorParameters::parse("lang=csharp,init_class_ns=Game").unwrap();
        assert_eq!(params.take("lang").as_deref(), Some("csharp"));
        assert_eq!(params.take("lang"), None);
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("init_class_ns", "Game")]);
    }

    #[test]
    fn test_table_from_yaml() {
        let table = CommandTable::from_yaml_str(
            "game.proto.LoginReq: 1001\ngame.proto.LoginRsp: 1002\n.game.proto.Ping: 7\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("game.proto.LoginReq"), Some(1001));
        assert_eq!(table.get("game.proto.Ping"), Some(7));
        assert_eq!(table.get("game.proto.Missing"), None);
    }

    #[test]
    fn test_table_rejects_two_spellings_of_one_name() {
        for _ in 0..16 {
            match CommandTable::from_yaml_str("game.A: 1\n.game.A: 2\n") {
                Err(GeneratorError::Config(msg)) => {
                    assert!(msg.contains("\"game.A\""), "{}", msg);
                    assert!(msg.contains("\".game.A\""), "{}", msg);
                }
                other => panic!("expected config error, got {:?}", other),
            }
        }

        let result = CommandTable::from_json_str(r#"{".game.A": 1, "game.A": 1}"#);
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_table_rejects_out_of_range_id() {
        let result = CommandTable::from_yaml_str("game.Big: 70000\n");
        assert!(matches!(result, Err(GeneratorError::Config(_))));

        let result = CommandTable::from_yaml_str("game.Negative: -1\n");
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_table_rejects_non_mapping() {
        let result = CommandTable::from_yaml_str("- game.LoginReq\n- game.LoginRsp\n");
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_empty_table() {
        assert!(CommandTable::from_yaml_str("").unwrap().is_empty());
        assert!(CommandTable::from_yaml_str("~\n").unwrap().is_empty());
        assert!(CommandTable::from_json_str("  ").unwrap().is_empty());
    }

    #[test]
    fn test_shared_ids_are_reported_not_rejected() {
        let table =
            CommandTable::from_entries([("a.Foo", 5u16), ("b.Bar", 5), ("c.Baz", 6)]).unwrap();

        let shared = table.shared_ids();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[&5], vec!["a.Foo", "b.Bar"]);
    }

    #[test]
    fn test_load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("cmd.yaml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "game.proto.LoginReq: 1001").unwrap();

        let json_path = dir.path().join("cmd.json");
        fs::write(&json_path, r#"{"game.proto.LoginRsp": 1002}"#).unwrap();

        let yaml = CommandTable::load(&yaml_path).unwrap();
        assert_eq!(yaml.get("game.proto.LoginReq"), Some(1001));

        let json = CommandTable::load(&json_path).unwrap();
        assert_eq!(json.get("game.proto.LoginRsp"), Some(1002));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CommandTable::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }
}
