//! # Configuration
//!
//! Loads `config.toml`: trust weights, seed identities and directories.
//!
//! ```toml
//! [trust_weights]
//! follow = 30
//! mention = 30
//! reply = 20
//! retweet = 50
//! quote = 40
//!
//! [seed_graph]
//! builders = ["alice", "@Bob"]
//!
//! [output]
//! raw_data_dir = "./raw"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! Every problem here is a `TrustError::Configuration` and aborts the run
//! before any input is read.

use seedtrust_core::{Identity, TrustError, WeightTable, normalize};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Artifact directory when `[output] trust_dir` is absent.
pub const DEFAULT_TRUST_DIR: &str = "./trust";

/// Artifact stem when `[output] output_name` is absent.
pub const DEFAULT_OUTPUT_NAME: &str = "seed_graph";

// =============================================================================
// FILE SHAPE
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    trust_weights: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    seed_graph: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    output: RawOutput,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    #[serde(default)]
    raw_data_dir: Option<PathBuf>,
    #[serde(default)]
    trust_dir: Option<PathBuf>,
    #[serde(default)]
    output_name: Option<String>,
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub weights: WeightTable,
    /// Normalized, deduplicated seeds in sorted order.
    pub seeds: Vec<Identity>,
    pub raw_data_dir: Option<PathBuf>,
    pub trust_dir: PathBuf,
    pub output_name: String,
}

impl AppConfig {
    /// Default artifact path: `<trust_dir>/<output_name>.csv`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.trust_dir.join(format!("{}.csv", self.output_name))
    }

    /// The raw data directory, preferring an explicit override.
    pub fn resolve_raw_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf, TrustError> {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.raw_data_dir.clone())
            .ok_or_else(|| {
                TrustError::Configuration(
                    "[output] raw_data_dir is not set and --raw-dir was not given".to_string(),
                )
            })
    }
}

/// Read and validate a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, TrustError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        TrustError::Configuration(format!("cannot read {}: {}", path.display(), e))
    })?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    parse_config(&raw, base_dir)
}

/// Validate config text; relative paths are joined onto `base_dir`.
pub fn parse_config(raw: &str, base_dir: &Path) -> Result<AppConfig, TrustError> {
    let parsed: RawConfig = toml::from_str(raw)
        .map_err(|e| TrustError::Configuration(format!("invalid config TOML: {}", e)))?;

    let entries = parsed.trust_weights.ok_or_else(|| {
        TrustError::Configuration("missing [trust_weights] section".to_string())
    })?;
    let weights = WeightTable::from_entries(entries)?;

    let seeds: BTreeSet<Identity> = parsed
        .seed_graph
        .values()
        .flatten()
        .map(|raw| normalize(raw))
        .filter(|identity| !identity.is_empty())
        .collect();
    if seeds.is_empty() {
        return Err(TrustError::Configuration(
            "no seed identities in [seed_graph]".to_string(),
        ));
    }

    let resolve = |p: PathBuf| {
        if p.is_absolute() {
            p
        } else {
            base_dir.join(p)
        }
    };

    let output_name = parsed
        .output
        .output_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
    if output_name.contains(['/', '\\']) {
        return Err(TrustError::Configuration(format!(
            "output_name '{}' must be a bare file stem",
            output_name
        )));
    }

    Ok(AppConfig {
        weights,
        seeds: seeds.into_iter().collect(),
        raw_data_dir: parsed.output.raw_data_dir.map(resolve),
        trust_dir: resolve(
            parsed
                .output
                .trust_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRUST_DIR)),
        ),
        output_name,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHTS: &str = r#"
[trust_weights]
follow = 30
mention = 30
reply = 20
retweet = 50
quote = 40
"#;

    fn with_weights(rest: &str) -> String {
        format!("{}\n{}", WEIGHTS, rest)
    }

    #[test]
    fn parses_full_config() {
        let raw = with_weights(
            r#"
[seed_graph]
builders = ["Alice", "@bob"]
writers = ["bob", "carol"]

[output]
raw_data_dir = "raw"
"#,
        );
        let config = parse_config(&raw, Path::new("/srv/trust")).expect("config");

        assert_eq!(config.weights, WeightTable::new(30, 30, 20, 50, 40));
        let seeds: Vec<&str> = config.seeds.iter().map(Identity::as_str).collect();
        assert_eq!(seeds, vec!["alice", "bob", "carol"]);
        assert_eq!(config.raw_data_dir, Some(PathBuf::from("/srv/trust/raw")));
        assert_eq!(
            config.output_path(),
            PathBuf::from("/srv/trust/./trust/seed_graph.csv")
        );
    }

    #[test]
    fn missing_weights_section_is_fatal() {
        let raw = "[seed_graph]\na = [\"alice\"]\n";
        let err = parse_config(raw, Path::new(".")).expect_err("no weights");
        assert!(err.to_string().contains("trust_weights"));
    }

    #[test]
    fn missing_weight_kind_is_fatal() {
        let raw = "[trust_weights]\nfollow = 1\n[seed_graph]\na = [\"alice\"]\n";
        assert!(matches!(
            parse_config(raw, Path::new(".")),
            Err(TrustError::Configuration(_))
        ));
    }

    #[test]
    fn fractional_weight_is_fatal() {
        let raw = WEIGHTS.replace("reply = 20", "reply = 20.5") + "[seed_graph]\na = [\"x\"]\n";
        assert!(parse_config(&raw, Path::new(".")).is_err());
    }

    #[test]
    fn negative_weight_is_fatal() {
        let raw = WEIGHTS.replace("quote = 40", "quote = -40") + "[seed_graph]\na = [\"x\"]\n";
        assert!(parse_config(&raw, Path::new(".")).is_err());
    }

    #[test]
    fn empty_seed_list_is_fatal() {
        let raw = with_weights("[seed_graph]\na = [\"@\", \"  \"]\n");
        assert!(parse_config(&raw, Path::new(".")).is_err());
    }

    #[test]
    fn raw_dir_override_wins() {
        let raw = with_weights("[seed_graph]\na = [\"alice\"]\n");
        let config = parse_config(&raw, Path::new(".")).expect("config");

        assert!(config.resolve_raw_dir(None).is_err());
        assert_eq!(
            config
                .resolve_raw_dir(Some(Path::new("/data/raw")))
                .expect("override"),
            PathBuf::from("/data/raw")
        );
    }

    #[test]
    fn output_name_must_be_a_stem() {
        let raw = with_weights("[seed_graph]\na = [\"alice\"]\n[output]\noutput_name = \"../x\"\n");
        assert!(parse_config(&raw, Path::new(".")).is_err());
    }
}
