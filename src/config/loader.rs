// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_COMPACT, TOML_EXTENSION, YAML_EXTENSIONS};
use crate::errors::{ConfigError, ParseError};
use crate::parser::Parser;
use crate::schema::Schema;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure for a workflow run.
///
/// Holds the workflow itself plus how it should be executed. It is loaded
/// from YAML or TOML, chosen by file extension.
///
/// # Fields
/// * `workflow` - The workflow, as one grammar string or as a token list
/// * `strategy` - How the reference scheduler drains rounds (optional, defaults to sequential)
/// * `executor_options` - Scheduler tuning (optional)
/// * `compact` - Whether to compact the schema before building (optional, defaults to true)
///
/// # Example
/// ```yaml
/// workflow: "echo hello world --: upcase --: reverse"
/// strategy: concurrent
/// executor_options:
///   max_concurrency: 4
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub workflow: WorkflowSource,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default = "default_compact")]
    pub compact: bool,
}

fn default_compact() -> bool {
    DEFAULT_COMPACT
}

/// A workflow written as a single string or as pre-split tokens.
///
/// Token lists skip shell-style splitting, so arguments containing spaces
/// need no quoting.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WorkflowSource {
    Text(String),
    Tokens(Vec<String>),
}

/// Execution strategy for the reference scheduler.
///
/// # Variants
/// * `Sequential` - Drains every round on the calling thread
/// * `Concurrent` - Drains each round with a pool of blocking workers
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Sequential,
    Concurrent,
}

/// Scheduler tuning.
///
/// # Fields
/// * `max_concurrency` - Worker count for concurrent runs (optional, defaults to available parallelism)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Parses the workflow into a schema. Tokens after an end flag are
    /// ignored.
    pub fn schema(&self) -> Result<Schema, ParseError> {
        let mut parser = Parser::new();
        match &self.workflow {
            WorkflowSource::Text(text) => parser.parse_str(text)?,
            WorkflowSource::Tokens(tokens) => parser.parse(tokens.iter().cloned())?,
        };
        Ok(parser.into_schema())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Reads a configuration file, picking the format from its extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if YAML_EXTENSIONS.contains(&extension.as_str()) {
        Config::from_yaml_str(&content)
    } else if extension == TOML_EXTENSION {
        Config::from_toml_str(&content)
    } else {
        Err(ConfigError::UnsupportedFormat { extension })
    }
}

/// Reads a configuration file and checks that its workflow parses and
/// validates. Validation warnings do not fail the load.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    let mut schema = cfg.schema()?;
    if cfg.compact {
        schema.compact();
    }

    let errors: Vec<_> = crate::config::validate_schema(&schema)
        .into_iter()
        .filter(|error| !error.is_warning())
        .collect();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
workflow: "echo hi --: upcase"
strategy: concurrent
executor_options:
  max_concurrency: 2
"#;

        let cfg = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.strategy, Strategy::Concurrent);
        assert_eq!(cfg.executor_options.max_concurrency, Some(2));
        assert!(cfg.compact);
        assert_eq!(cfg.workflow, WorkflowSource::Text("echo hi --: upcase".to_string()));
    }

    #[test]
    fn test_token_list_workflow() {
        let yaml = r#"
workflow: [wrap, --prefix, "> ", "--:", upcase]
compact: false
"#;

        let cfg = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.strategy, Strategy::Sequential);
        assert!(!cfg.compact);

        let schema = cfg.schema().unwrap();
        assert_eq!(schema.argvs(), vec![vec!["wrap", "--prefix", "> "], vec!["upcase"]]);
    }

    #[test]
    fn test_toml_config() {
        let toml = r#"
workflow = "echo a --[] upcase"
strategy = "sequential"

[executor_options]
max_concurrency = 3
"#;

        let cfg = Config::from_toml_str(toml).unwrap();
        assert_eq!(cfg.executor_options.max_concurrency, Some(3));
        assert_eq!(cfg.schema().unwrap().joins().len(), 1);
    }

    #[test]
    fn test_load_config_by_extension() {
        let yaml = write_config(".yml", "workflow: echo\n");
        assert!(load_config(yaml.path()).is_ok());

        let toml = write_config(".toml", "workflow = \"echo\"\n");
        assert!(load_config(toml.path()).is_ok());

        let json = write_config(".json", "{\"workflow\": \"echo\"}");
        match load_config(json.path()) {
            Err(ConfigError::UnsupportedFormat { extension }) => assert_eq!(extension, "json"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config("does/not/exist.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_and_validate_rejects_bad_grammar() {
        let file = write_config(".yaml", "workflow: \"a --0[1} b\"\n");
        assert!(matches!(
            load_and_validate_config(file.path()),
            Err(ConfigError::Parse(ParseError::UnrecognizedBreak { .. }))
        ));
    }

    #[test]
    fn test_load_and_validate_allows_cycles() {
        let file = write_config(".yaml", "workflow: \"a --: b --1:0\"\n");
        assert!(load_and_validate_config(file.path()).is_ok());
    }
}
