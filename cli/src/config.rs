//! Configuration file loading and resolution.
//!
//! The config document is JSON mapping decoder/checker identifiers to
//! overrides; absent entries fall back to built-in defaults. Every
//! malformed or unknown entry is a fatal [`ConfigError`] surfaced before
//! the search begins — overrides are never silently ignored.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use peel_analysis::{
    Checker, CheckerSet, ConfirmPort, DictionaryChecker, DictionaryConfig, QuadgramChecker,
    QuadgramConfig, ScriptChecker, ScriptConfig, SetConfig,
};
use peel_codecs::DecoderCatalog;
use peel_search::{SearchOrdering, SearchPolicy};

/// Fatal configuration error; the process exits 2 without searching.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, detail: String },
    Parse { path: String, detail: String },
    UnknownDecoder { identifier: String },
    UnknownChecker { identifier: String },
    InvalidPattern { detail: String },
    InvalidSearcher { value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, detail } => write!(f, "cannot read {path}: {detail}"),
            Self::Parse { path, detail } => write!(f, "malformed config {path}: {detail}"),
            Self::UnknownDecoder { identifier } => {
                write!(f, "config names unknown decoder: {identifier}")
            }
            Self::UnknownChecker { identifier } => {
                write!(f, "unknown checker: {identifier}")
            }
            Self::InvalidPattern { detail } => {
                write!(f, "invalid dictionary pattern: {detail}")
            }
            Self::InvalidSearcher { value } => {
                write!(f, "unknown searcher: {value} (expected astar or bfs)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-decoder override block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderOverride {
    pub priority: Option<i32>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// Checker threshold overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerOverrides {
    pub quadgram_accept_score: Option<f64>,
    pub quadgram_min_letters: Option<usize>,
    pub script_accept_ratio: Option<f64>,
    pub dictionary_min_hit_ratio: Option<f64>,
    pub dictionary_pattern: Option<String>,
    pub ambiguous_confidence: Option<f64>,
}

/// Search budget overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchOverrides {
    pub max_depth: Option<u32>,
    pub max_nodes: Option<u64>,
    pub max_children_per_node: Option<usize>,
    pub parallel_workers: Option<usize>,
    pub deadline_ms: Option<u64>,
}

/// The whole config document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub decoders: BTreeMap<String, DecoderOverride>,
    #[serde(default)]
    pub checkers: CheckerOverrides,
    #[serde(default)]
    pub search: SearchOverrides,
}

impl ConfigFile {
    /// Load and parse a JSON config document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when unreadable, [`ConfigError::Parse`] when
    /// not valid JSON or carrying unknown fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Apply decoder overrides to the catalog.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownDecoder`] if an override names a decoder that
    /// is not registered.
    pub fn apply_to_catalog(&self, catalog: &mut DecoderCatalog) -> Result<(), ConfigError> {
        for (identifier, entry) in &self.decoders {
            if let Some(priority) = entry.priority {
                catalog
                    .override_priority(identifier, priority)
                    .map_err(|_| ConfigError::UnknownDecoder {
                        identifier: identifier.clone(),
                    })?;
            }
            for (key, value) in &entry.parameters {
                catalog
                    .override_param(identifier, key, value)
                    .map_err(|_| ConfigError::UnknownDecoder {
                        identifier: identifier.clone(),
                    })?;
            }
        }
        Ok(())
    }

    /// Resolve the search policy from defaults plus overrides.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSearcher`] for an unknown `--searcher` value.
    pub fn build_policy(&self, searcher: &str) -> Result<SearchPolicy, ConfigError> {
        let ordering = match searcher {
            "astar" => SearchOrdering::PriorityFirst,
            "bfs" => SearchOrdering::BreadthFirst,
            other => {
                return Err(ConfigError::InvalidSearcher {
                    value: other.to_string(),
                })
            }
        };
        let defaults = SearchPolicy::default();
        Ok(SearchPolicy {
            max_depth: self.search.max_depth.unwrap_or(defaults.max_depth),
            max_nodes: self.search.max_nodes.unwrap_or(defaults.max_nodes),
            max_children_per_node: self
                .search
                .max_children_per_node
                .unwrap_or(defaults.max_children_per_node),
            parallel_workers: self
                .search
                .parallel_workers
                .unwrap_or(defaults.parallel_workers),
            deadline: self.search.deadline_ms.map(Duration::from_millis),
            ordering,
        })
    }

    /// Build the checker set: the `-C` selection (all three when `None`)
    /// with thresholds resolved from this config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownChecker`] for an unrecognized selection entry,
    /// [`ConfigError::InvalidPattern`] for a malformed dictionary regex.
    pub fn build_checkers(
        &self,
        selection: Option<&[String]>,
        confirm: Arc<dyn ConfirmPort>,
    ) -> Result<CheckerSet, ConfigError> {
        let names: Vec<&str> = match selection {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => vec!["quadgram", "script", "dictionary"],
        };
        let mut checkers: Vec<Box<dyn Checker>> = Vec::new();
        for name in names {
            match name {
                "quadgram" => {
                    let defaults = QuadgramConfig::default();
                    checkers.push(Box::new(QuadgramChecker::new(QuadgramConfig {
                        accept_score: self
                            .checkers
                            .quadgram_accept_score
                            .unwrap_or(defaults.accept_score),
                        min_letters: self
                            .checkers
                            .quadgram_min_letters
                            .unwrap_or(defaults.min_letters),
                    })));
                }
                "script" => {
                    let defaults = ScriptConfig::default();
                    checkers.push(Box::new(ScriptChecker::new(ScriptConfig {
                        accept_ratio: self
                            .checkers
                            .script_accept_ratio
                            .unwrap_or(defaults.accept_ratio),
                        min_chars: defaults.min_chars,
                    })));
                }
                "dictionary" => {
                    let defaults = DictionaryConfig::default();
                    let checker = DictionaryChecker::new(DictionaryConfig {
                        min_hit_ratio: self
                            .checkers
                            .dictionary_min_hit_ratio
                            .unwrap_or(defaults.min_hit_ratio),
                        min_tokens: defaults.min_tokens,
                        pattern: self.checkers.dictionary_pattern.clone(),
                    })
                    .map_err(|e| ConfigError::InvalidPattern {
                        detail: e.to_string(),
                    })?;
                    checkers.push(Box::new(checker));
                }
                other => {
                    return Err(ConfigError::UnknownChecker {
                        identifier: other.to_string(),
                    })
                }
            }
        }
        let set_config = SetConfig {
            ambiguous_confidence: self
                .checkers
                .ambiguous_confidence
                .unwrap_or(SetConfig::default().ambiguous_confidence),
        };
        Ok(CheckerSet::new(checkers, confirm, set_config))
    }
}

/// Load a newline-delimited wordlist (candidate Vigenère keys).
///
/// # Errors
///
/// [`ConfigError::Io`] when the file cannot be read.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use peel_analysis::DenyAll;
    use peel_codecs::builtin_catalog;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_config_uses_defaults() {
        let file = write_config("{}");
        let config = ConfigFile::load(file.path()).unwrap();
        let policy = config.build_policy("astar").unwrap();
        assert_eq!(policy, SearchPolicy::default());
    }

    #[test]
    fn decoder_priority_override_applies() {
        let file = write_config(r#"{"decoders": {"hex": {"priority": 95}}}"#);
        let config = ConfigFile::load(file.path()).unwrap();
        let mut catalog = builtin_catalog(None);
        config.apply_to_catalog(&mut catalog).unwrap();
        assert_eq!(catalog.iter().next().unwrap().identifier, "hex");
    }

    #[test]
    fn unknown_decoder_is_fatal() {
        let file = write_config(r#"{"decoders": {"rot14": {"priority": 1}}}"#);
        let config = ConfigFile::load(file.path()).unwrap();
        let mut catalog = builtin_catalog(None);
        let err = config.apply_to_catalog(&mut catalog).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDecoder { .. }));
    }

    #[test]
    fn unknown_top_level_field_is_fatal() {
        let file = write_config(r#"{"decodres": {}}"#);
        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn search_overrides_resolve() {
        let file = write_config(
            r#"{"search": {"max_depth": 3, "max_nodes": 99, "deadline_ms": 1500}}"#,
        );
        let config = ConfigFile::load(file.path()).unwrap();
        let policy = config.build_policy("bfs").unwrap();
        assert_eq!(policy.max_depth, 3);
        assert_eq!(policy.max_nodes, 99);
        assert_eq!(policy.deadline, Some(Duration::from_millis(1500)));
        assert_eq!(policy.ordering, SearchOrdering::BreadthFirst);
    }

    #[test]
    fn invalid_searcher_is_fatal() {
        let config = ConfigFile::default();
        assert!(matches!(
            config.build_policy("dfs"),
            Err(ConfigError::InvalidSearcher { .. })
        ));
    }

    #[test]
    fn checker_selection_restricts_the_set() {
        let config = ConfigFile::default();
        let set = config
            .build_checkers(Some(&["quadgram".to_string()]), Arc::new(DenyAll))
            .unwrap();
        assert_eq!(set.names(), vec!["quadgram"]);
    }

    #[test]
    fn unknown_checker_selection_is_fatal() {
        let config = ConfigFile::default();
        let err = config
            .build_checkers(Some(&["entropy".to_string()]), Arc::new(DenyAll))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChecker { .. }));
    }

    #[test]
    fn wordlist_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lemon\n\n# comment\napple ").unwrap();
        let keys = load_wordlist(file.path()).unwrap();
        assert_eq!(keys, vec!["lemon".to_string(), "apple".to_string()]);
    }
}
