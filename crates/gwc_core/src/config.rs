//! Serialisable run settings.
//!
//! A `CollapseConfig` names the seed, the built-in collapse order and the
//! fallback policy. Node graphs carry closures and are built in code; the
//! config only picks how they are run.
//!
//! ```json
//! { "seed": 42, "order": { "fixed": ["b", "a"] }, "fallback": "nil_aware" }
//! ```
//!
//! Missing fields take their defaults: seed 0, ascending order, forced pick.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GwcResult;
use crate::graph_wave::{FallbackPolicy, OrderKind};

/// Settings for a single collapse run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapseConfig {
    /// Seed for `StdRandom`.
    pub seed: u64,
    /// Which built-in order drives the run.
    pub order: OrderKind,
    /// Fallback used by superpositions that don't pin their own.
    pub fallback: FallbackPolicy,
}

impl CollapseConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> GwcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> GwcResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), seed = config.seed, "loaded collapse config");
        Ok(config)
    }

    /// Save this config as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> GwcResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(path = %path.display(), "saved collapse config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GwcError;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = CollapseConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.order, OrderKind::Ascending);
        assert_eq!(config.fallback, FallbackPolicy::ForcedPick);

        assert_eq!(CollapseConfig::from_json_str("{}").unwrap(), CollapseConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = CollapseConfig::from_json_str(
            r#"{ "seed": 42, "order": { "fixed": ["b", "a"] }, "fallback": "nil_aware" }"#,
        )
        .unwrap();
        assert_eq!(config.order, OrderKind::Fixed(vec!["b".into(), "a".into()]));
        assert_eq!(config.fallback, FallbackPolicy::NilAware);
    }

    #[test]
    fn test_unknown_order_is_a_config_error() {
        let err = CollapseConfig::from_json_str(r#"{ "order": "sideways" }"#).unwrap_err();
        assert!(matches!(err, GwcError::Config(_)));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("collapse.json");

        let config = CollapseConfig {
            seed: 1337,
            order: OrderKind::Neighbourhood,
            fallback: FallbackPolicy::NilAware,
        };
        config.save(&path).unwrap();

        let loaded = CollapseConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = CollapseConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GwcError::Io(_)));
    }
}
