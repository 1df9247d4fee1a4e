//! # Configuration Management
//!
//! This module handles loading and validating project configuration: the
//! rulesets a review run evaluates and the evaluation-service URL.
//!
//! ## Configuration File Location
//!
//! `.redline/config.json` at the project root. The project root is found by
//! walking up from the working directory until a `.redline/` directory
//! appears.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::types::Ruleset;

/// Default evaluation service base URL
const DEFAULT_BASE_URL: &str = "https://api.redline.dev";

/// Environment variable for overriding the base URL
const BASE_URL_ENV_VAR: &str = "REDLINE_BASE_URL";

/// Relative path of the config file under the project root
const CONFIG_FILE: &str = ".redline/config.json";

/// Errors raised while locating, reading, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no .redline directory found in {start} or any parent directory")]
    NotAProject { start: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration defines no rulesets")]
    NoRulesets,

    #[error("ruleset '{name}' has no include patterns")]
    EmptyInclude { name: String },

    #[error("ruleset '{name}' has invalid glob pattern '{pattern}': {detail}")]
    InvalidPattern {
        name: String,
        pattern: String,
        detail: String,
    },

    #[error("ruleset '{name}' defines rule code '{code}' more than once")]
    DuplicateRuleCode { name: String, code: String },
}

/// Project configuration
///
/// Deserialized from `.redline/config.json` and validated before any
/// review work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rulesets to evaluate, each scoped by glob patterns
    pub rulesets: Vec<Ruleset>,
    /// Evaluation service base URL (stored in config file)
    #[serde(
        rename = "baseUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    stored_base_url: Option<String>,
}

impl Config {
    /// Load and validate configuration from a project root.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(ConfigError)` - File missing, malformed, or invalid
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILE);
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants the rest of the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rulesets.is_empty() {
            return Err(ConfigError::NoRulesets);
        }

        for ruleset in &self.rulesets {
            if ruleset.include.is_empty() {
                return Err(ConfigError::EmptyInclude {
                    name: ruleset.name.clone(),
                });
            }

            for pattern in &ruleset.include {
                if let Err(e) = glob::Pattern::new(pattern) {
                    return Err(ConfigError::InvalidPattern {
                        name: ruleset.name.clone(),
                        pattern: pattern.clone(),
                        detail: e.to_string(),
                    });
                }
            }

            let mut seen = std::collections::HashSet::new();
            for rule in &ruleset.rules {
                if !seen.insert(rule.code.as_str()) {
                    return Err(ConfigError::DuplicateRuleCode {
                        name: ruleset.name.clone(),
                        code: rule.code.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the effective base URL
    ///
    /// Environment variable `REDLINE_BASE_URL` takes precedence over the
    /// config file, which takes precedence over the default.
    pub fn base_url(&self) -> String {
        std::env::var(BASE_URL_ENV_VAR)
            .ok()
            .or_else(|| self.stored_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Find the project root by walking up from `start` until a `.redline/`
/// directory appears.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start;
    loop {
        if current.join(".redline").is_dir() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(ConfigError::NotAProject {
                    start: start.display().to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::{Level, Rule};
    use std::env;
    use tempfile::TempDir;

    fn write_config(root: &Path, contents: &str) {
        let dir = root.join(".redline");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.json"), contents).unwrap();
    }

    fn valid_config_json() -> &'static str {
        r#"{
            "rulesets": [
                {
                    "name": "docs",
                    "include": ["**/*.md"],
                    "rules": [
                        {"code": "no-todo", "level": "error", "description": "no TODO markers"}
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), valid_config_json());

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.rulesets.len(), 1);
        assert_eq!(config.rulesets[0].name, "docs");
        assert_eq!(config.rulesets[0].rules[0].level, Level::Error);
    }

    #[test]
    fn test_load_missing_config_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_config_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "{ not json");
        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_rulesets() {
        let config = Config {
            rulesets: vec![],
            stored_base_url: None,
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoRulesets)));
    }

    #[test]
    fn test_validate_rejects_empty_include() {
        let config = Config {
            rulesets: vec![Ruleset {
                name: "docs".to_string(),
                include: vec![],
                rules: vec![],
            }],
            stored_base_url: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyInclude { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_invalid_pattern() {
        let config = Config {
            rulesets: vec![Ruleset {
                name: "docs".to_string(),
                include: vec!["[".to_string()],
                rules: vec![],
            }],
            stored_base_url: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_rule_codes() {
        let rule = Rule {
            code: "no-todo".to_string(),
            level: Level::Error,
            description: "no TODO markers".to_string(),
        };
        let config = Config {
            rulesets: vec![Ruleset {
                name: "docs".to_string(),
                include: vec!["**/*.md".to_string()],
                rules: vec![rule.clone(), rule],
            }],
            stored_base_url: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateRuleCode { .. })
        ));
    }

    #[test]
    fn test_base_url_precedence() {
        env::remove_var(BASE_URL_ENV_VAR);

        let mut config = Config {
            rulesets: vec![],
            stored_base_url: None,
        };
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);

        config.stored_base_url = Some("http://stored.example.com".to_string());
        assert_eq!(config.base_url(), "http://stored.example.com");

        env::set_var(BASE_URL_ENV_VAR, "http://env.example.com");
        assert_eq!(config.base_url(), "http://env.example.com");
        env::remove_var(BASE_URL_ENV_VAR);
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), valid_config_json());
        let nested = temp.path().join("docs/guides");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, temp.path());
    }

    #[test]
    fn test_find_project_root_fails_outside_project() {
        let temp = TempDir::new().unwrap();
        let err = find_project_root(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAProject { .. }));
    }
}
