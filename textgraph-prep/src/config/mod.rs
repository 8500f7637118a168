//! Configuration loader and validator.
//!
//! Responsibilities:
//! - Read an optional YAML file to populate [`PrepConfig`]
//! - Apply ENV overrides on top of it
//! - Validate constraints (e.g., `pmi_window` must be > 0)

pub mod model;

use crate::config::model::PrepConfig;
use crate::errors::{GraphPrepError, GraphPrepResult};
use std::{fs, path::Path};
use tracing::{debug, info};

/// ENV: `true`/`false`, overrides `corpus.multi_label`.
pub const ENV_MULTI_LABEL: &str = "TEXTGRAPH_MULTI_LABEL";
/// ENV: positive integer, overrides `stats.pmi_window`.
pub const ENV_PMI_WINDOW: &str = "TEXTGRAPH_PMI_WINDOW";
/// ENV: `skip` | `zero_vector` | `fail`, overrides `corpus.empty_documents`.
pub const ENV_EMPTY_DOCUMENTS: &str = "TEXTGRAPH_EMPTY_DOCUMENTS";

/// Load [`PrepConfig`] from `path` (YAML) or defaults, then apply ENV overrides and validate.
pub fn load(path: Option<&Path>) -> GraphPrepResult<PrepConfig> {
    let mut cfg = match path {
        Some(p) => {
            let raw = fs::read_to_string(p)?;
            info!(path = %p.display(), "Loading config file");
            serde_yml::from_str::<PrepConfig>(&raw)?
        }
        None => PrepConfig::default(),
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply overrides read through `lookup` (ENV in production, a map in tests).
pub fn apply_env_overrides<F>(cfg: &mut PrepConfig, lookup: F) -> GraphPrepResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_MULTI_LABEL) {
        cfg.corpus.multi_label = parse_bool(ENV_MULTI_LABEL, &v)?;
        debug!(multi_label = cfg.corpus.multi_label, "env override");
    }
    if let Some(v) = lookup(ENV_PMI_WINDOW) {
        cfg.stats.pmi_window = v.trim().parse().map_err(|_| {
            GraphPrepError::Config(format!("{ENV_PMI_WINDOW} is not a number: {v}"))
        })?;
        debug!(pmi_window = cfg.stats.pmi_window, "env override");
    }
    if let Some(v) = lookup(ENV_EMPTY_DOCUMENTS) {
        cfg.corpus.empty_documents = v.parse()?;
        debug!(policy = ?cfg.corpus.empty_documents, "env override");
    }
    Ok(())
}

fn parse_bool(key: &str, v: &str) -> GraphPrepResult<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GraphPrepError::Config(format!("{key} is not a boolean: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::EmptyDocumentPolicy;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn yaml_partial_config_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "corpus:\n  multi_label: true\nstats:\n  pmi_window: 5").unwrap();

        let mut cfg: PrepConfig =
            serde_yml::from_str(&std::fs::read_to_string(f.path()).unwrap()).unwrap();
        apply_env_overrides(&mut cfg, |_| None).unwrap();

        assert!(cfg.corpus.multi_label);
        assert_eq!(cfg.stats.pmi_window, 5);
        assert_eq!(cfg.corpus.empty_documents, EmptyDocumentPolicy::Skip);
        assert_eq!(cfg.graph.self_loop_weight, 1.0);
        assert!(cfg.export.graphml);
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            (ENV_MULTI_LABEL, "yes"),
            (ENV_PMI_WINDOW, "7"),
            (ENV_EMPTY_DOCUMENTS, "zero_vector"),
        ]
        .into_iter()
        .collect();

        let mut cfg = PrepConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert!(cfg.corpus.multi_label);
        assert_eq!(cfg.stats.pmi_window, 7);
        assert_eq!(cfg.corpus.empty_documents, EmptyDocumentPolicy::ZeroVector);
    }

    #[test]
    fn bad_env_value_is_config_error() {
        let mut cfg = PrepConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == ENV_MULTI_LABEL).then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, GraphPrepError::Config(_)));
    }

    #[test]
    fn zero_window_fails_validation() {
        let mut cfg = PrepConfig::default();
        cfg.stats.pmi_window = 0;
        assert!(cfg.validate().is_err());
    }
}
