//! Configuration management for the Explorer demo
//!
//! Configuration is loaded from environment variables, falling back to a
//! `.env` file in the working directory and then to the user env file
//! (`~/.config/explorer-demo/env`).

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::models::{Collection, Reference, ReferenceId};

/// Id of the collection every new query searches by default.
pub const DEFAULT_COLLECTION_ID: ReferenceId = 8_875_027;

/// Display label of [`DEFAULT_COLLECTION_ID`].
pub const DEFAULT_COLLECTION_LABEL: &str = "U.S. Mainstream Media";

/// The built-in default collection set, already resolved.
#[must_use]
pub fn builtin_default_collections() -> Vec<Reference<Collection>> {
    vec![Reference::Resolved(Collection {
        tags_id: DEFAULT_COLLECTION_ID,
        label: DEFAULT_COLLECTION_LABEL.to_string(),
        description: None,
    })]
}

/// Main configuration struct for the Explorer demo
#[derive(Debug, Clone)]
pub struct Config {
    /// Collection ids used when a query names no collections (empty = built-in set).
    pub default_collection_ids: Vec<ReferenceId>,
    /// JSON file holding the sample-search catalog.
    pub samples_path: Option<PathBuf>,
    /// JSON file holding the in-memory lookup directory.
    pub lookup_fixtures_path: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Maximum number of notices kept in state; older ones are dropped first.
    pub max_notices: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_collection_ids: Vec::new(),
            samples_path: None,
            lookup_fixtures_path: None,
            log_level: "info".to_string(),
            max_notices: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = full_env_value("EXPLORER_DEFAULT_COLLECTIONS") {
            config.default_collection_ids = parse_csv(&v)
                .iter()
                .filter_map(|id| {
                    let parsed = id.parse().ok();
                    if parsed.is_none() {
                        tracing::warn!(value = %id, "ignoring non-numeric default collection id");
                    }
                    parsed
                })
                .collect();
        }
        config.samples_path = env_path("EXPLORER_SAMPLES_PATH");
        config.lookup_fixtures_path = env_path("EXPLORER_LOOKUP_FIXTURES");
        if let Some(v) = full_env_value("EXPLORER_LOG_LEVEL") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                config.log_level = trimmed.to_string();
            }
        }
        config.max_notices = env_usize("EXPLORER_MAX_NOTICES", config.max_notices);

        config
    }

    /// The collection set a query gets when it names none.
    ///
    /// Ids that match the built-in default are resolved in place; any other
    /// configured id is left for the collections lookup.
    #[must_use]
    pub fn default_collections(&self) -> Vec<Reference<Collection>> {
        if self.default_collection_ids.is_empty() {
            return builtin_default_collections();
        }
        self.default_collection_ids
            .iter()
            .map(|&id| {
                if id == DEFAULT_COLLECTION_ID {
                    Reference::Resolved(Collection {
                        tags_id: id,
                        label: DEFAULT_COLLECTION_LABEL.to_string(),
                        description: None,
                    })
                } else {
                    Reference::Unresolved(id)
                }
            })
            .collect()
    }
}

// =============================================================================
// Environment access
// =============================================================================

static DOTENV_VALUES: OnceLock<HashMap<String, String>> = OnceLock::new();
static USER_ENV_VALUES: OnceLock<HashMap<String, String>> = OnceLock::new();

#[cfg(test)]
thread_local! {
    static TEST_ENV_OVERRIDES: std::cell::RefCell<HashMap<String, String>> =
        std::cell::RefCell::new(HashMap::new());
}

#[cfg(test)]
fn test_env_override_value(key: &str) -> Option<String> {
    TEST_ENV_OVERRIDES.with(|cell| cell.borrow().get(key).cloned())
}

/// Read a value from the real environment first, falling back to .env.
#[must_use]
pub fn env_value(key: &str) -> Option<String> {
    #[cfg(test)]
    if let Some(v) = test_env_override_value(key) {
        return Some(v);
    }
    env::var(key).ok().or_else(|| dotenv_value(key))
}

/// Read a value with full precedence: process env → `.env` → user env file.
#[must_use]
pub fn full_env_value(key: &str) -> Option<String> {
    env_value(key).or_else(|| user_env_value(key))
}

/// Read a value from the .env file (if present).
#[must_use]
pub fn dotenv_value(key: &str) -> Option<String> {
    DOTENV_VALUES
        .get_or_init(|| load_env_file(Path::new(".env")))
        .get(key)
        .cloned()
}

/// Read a value from the user env file (if present).
#[must_use]
pub fn user_env_value(key: &str) -> Option<String> {
    USER_ENV_VALUES
        .get_or_init(|| user_env_file_path().map_or_else(HashMap::new, |p| load_env_file(&p)))
        .get(key)
        .cloned()
}

/// Location of the user env file: `<config dir>/explorer-demo/env`.
#[must_use]
pub fn user_env_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("explorer-demo").join("env"))
}

fn load_env_file(path: &Path) -> HashMap<String, String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    parse_env_contents(&contents)
}

/// Parse `KEY=value` lines. Blank lines and `#` comments are skipped, an
/// optional `export ` prefix is accepted, and matching quotes are stripped.
#[must_use]
pub fn parse_env_contents(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let content = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value)) = content.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn env_path(key: &str) -> Option<PathBuf> {
    full_env_value(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_usize(key: &str, default: usize) -> usize {
    full_env_value(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEnvOverrideGuard {
        previous: Vec<(String, Option<String>)>,
    }

    impl TestEnvOverrideGuard {
        fn set(vars: &[(&str, &str)]) -> Self {
            let mut previous = Vec::new();
            TEST_ENV_OVERRIDES.with(|cell| {
                let mut map = cell.borrow_mut();
                for (key, value) in vars {
                    let old = map.get(*key).cloned();
                    previous.push(((*key).to_string(), old));
                    map.insert((*key).to_string(), (*value).to_string());
                }
            });
            Self { previous }
        }
    }

    impl Drop for TestEnvOverrideGuard {
        fn drop(&mut self) {
            TEST_ENV_OVERRIDES.with(|cell| {
                let mut map = cell.borrow_mut();
                for (key, value) in self.previous.drain(..) {
                    match value {
                        Some(v) => {
                            map.insert(key, v);
                        }
                        None => {
                            map.remove(&key);
                        }
                    }
                }
            });
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.default_collection_ids.is_empty());
        assert!(config.samples_path.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_notices, 20);
        assert_eq!(
            config.default_collections(),
            builtin_default_collections()
        );
    }

    #[test]
    fn test_config_from_env() {
        let _env = TestEnvOverrideGuard::set(&[
            ("EXPLORER_DEFAULT_COLLECTIONS", "8875027, 9139487,bogus"),
            ("EXPLORER_SAMPLES_PATH", "/tmp/samples.json"),
            ("EXPLORER_LOG_LEVEL", " debug "),
            ("EXPLORER_MAX_NOTICES", "5"),
        ]);

        let config = Config::from_env();
        assert_eq!(config.default_collection_ids, vec![8_875_027, 9_139_487]);
        assert_eq!(
            config.samples_path.as_deref(),
            Some(Path::new("/tmp/samples.json"))
        );
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_notices, 5);

        let defaults = config.default_collections();
        assert!(defaults[0].is_resolved());
        assert_eq!(defaults[1], Reference::Unresolved(9_139_487));
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let _env = TestEnvOverrideGuard::set(&[("EXPLORER_MAX_NOTICES", "lots")]);
        assert_eq!(Config::from_env().max_notices, 20);
    }

    #[test]
    fn test_parse_env_contents() {
        let parsed = parse_env_contents(
            "# comment\n\nexport EXPLORER_LOG_LEVEL=\"warn\"\nEXPLORER_SAMPLES_PATH = 'a b.json'\nnot a pair\n=novalue\n",
        );
        assert_eq!(parsed.get("EXPLORER_LOG_LEVEL").map(String::as_str), Some("warn"));
        assert_eq!(
            parsed.get("EXPLORER_SAMPLES_PATH").map(String::as_str),
            Some("a b.json")
        );
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_parse_csv() {
        assert_eq!(parse_csv(" a, ,b,"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_csv("").is_empty());
    }
}
