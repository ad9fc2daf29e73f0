use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use partknn_io::{Params, read_params};
use partknn_knn::QueryPoint;

use crate::cli::QueryArgs;
use crate::convert;

/// Top-level partknn configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartknnConfig {
    /// Number of neighbors.
    #[serde(default)]
    pub k: Option<usize>,

    /// Features per record, excluding the label. When unset, the length of
    /// the query in use decides, falling back to the library default.
    #[serde(default)]
    pub n_features: Option<usize>,

    /// Query feature values.
    #[serde(default)]
    pub query: Option<Vec<f64>>,

    /// Record format settings.
    #[serde(default)]
    pub input: InputToml,

    /// Execution settings.
    #[serde(default)]
    pub run: RunToml,
}

impl PartknnConfig {
    /// Reads the TOML file at `path`, or returns defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

/// Loads the config and, if given, the parameter file.
pub fn load_sources(args: &QueryArgs) -> Result<(PartknnConfig, Option<Params>)> {
    let config = PartknnConfig::load(args.config.as_deref())?;
    let params = match args.params {
        Some(ref path) => Some(
            read_params(path)
                .with_context(|| format!("failed to read parameter file: {}", path.display()))?,
        ),
        None => None,
    };
    Ok((config, params))
}

/// Loads the config and parameter file, and builds the query.
pub fn load_query(args: &QueryArgs) -> Result<(PartknnConfig, QueryPoint)> {
    let (config, params) = load_sources(args)?;
    let query = convert::build_query(&config, params.as_ref(), args.k)?;
    Ok((config, query))
}

/// `[input]`: how data records are laid out.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    /// Field separator; a single character, or `"tab"`.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Lines starting with this are headers. Empty disables header detection.
    #[serde(default = "default_header_prefix")]
    pub header_prefix: String,
}

impl Default for InputToml {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            header_prefix: default_header_prefix(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}
fn default_header_prefix() -> String {
    partknn_io::DEFAULT_HEADER_PREFIX.to_string()
}

/// `[run]`: partitioning and parallelism.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    /// Number of data partitions ranked independently.
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    /// Worker threads for ranking; 0 uses the rayon default.
    #[serde(default)]
    pub threads: usize,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            threads: 0,
        }
    }
}

fn default_partitions() -> usize {
    1
}
