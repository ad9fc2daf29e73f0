//! Pure conversion functions: TOML config and CLI overrides -> crate API types.

use anyhow::{Context, Result, bail};

use partknn_io::{Params, RecordFormat};
use partknn_knn::{DEFAULT_N_FEATURES, KnnConfig, QueryPoint};

use crate::config::{InputToml, PartknnConfig, RunToml};

/// Parses a delimiter setting: a single character, or `"tab"`.
pub fn parse_delimiter(s: &str) -> Result<char> {
    if s.eq_ignore_ascii_case("tab") {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("[input].delimiter must be a single character or \"tab\", got {s:?}"),
    }
}

/// Builds a [`RecordFormat`] from the TOML input configuration.
pub fn build_record_format(input: &InputToml) -> Result<RecordFormat> {
    let delimiter = parse_delimiter(&input.delimiter)?;
    if !delimiter.is_ascii() {
        bail!("[input].delimiter must be an ASCII character, got {delimiter:?}");
    }
    let byte = delimiter as u8;
    if matches!(byte, b'.' | b'-' | b'"') || byte.is_ascii_digit() {
        bail!("[input].delimiter {delimiter:?} cannot separate numeric fields");
    }
    let prefix = Some(input.header_prefix.as_str()).filter(|p| !p.is_empty());
    Ok(RecordFormat::default()
        .with_delimiter(byte)
        .with_header_prefix(prefix))
}

/// Resolves K: `--k`, then the parameter file, then `k` in the config.
pub fn resolve_k(
    config: &PartknnConfig,
    params: Option<&Params>,
    k_override: Option<usize>,
) -> Result<usize> {
    match k_override.or(params.map(|p| p.k)).or(config.k) {
        Some(k) => Ok(k),
        None => bail!("no k: set `k` in config, pass --params, or use --k"),
    }
}

/// Resolves the feature count: `n_features` in the config, then the length
/// of the query in use, then [`DEFAULT_N_FEATURES`].
pub fn resolve_n_features(config: &PartknnConfig, params: Option<&Params>) -> usize {
    config
        .n_features
        .or_else(|| params.map(|p| p.query.len()))
        .or_else(|| config.query.as_ref().map(Vec::len))
        .unwrap_or(DEFAULT_N_FEATURES)
}

/// Resolves K and the query, then validates them together.
///
/// The query comes from the parameter file when given, else `query` in the
/// config.
pub fn build_query(
    config: &PartknnConfig,
    params: Option<&Params>,
    k_override: Option<usize>,
) -> Result<QueryPoint> {
    let k = resolve_k(config, params, k_override)?;
    let Some(features) = params
        .map(|p| p.query.clone())
        .or_else(|| config.query.clone())
    else {
        bail!("no query: set `query` in config or pass --params");
    };

    let knn_cfg = KnnConfig::new(k).with_n_features(resolve_n_features(config, params));
    QueryPoint::new(features, &knn_cfg).context("invalid query configuration")
}

/// Resolves the partition count; `--partitions` overrides `[run].partitions`.
pub fn resolve_partitions(run: &RunToml, cli: Option<usize>) -> Result<usize> {
    let n = cli.unwrap_or(run.partitions);
    if n == 0 {
        bail!("partitions must be >= 1, got 0");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml_str: &str) -> PartknnConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter("TAB").unwrap(), '\t');
        assert_eq!(parse_delimiter("\t").unwrap(), '\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
    }

    #[test]
    fn test_record_format() {
        let format = build_record_format(&InputToml {
            delimiter: ";".to_string(),
            header_prefix: String::new(),
        })
        .unwrap();
        assert_eq!(format.delimiter(), b';');
        assert_eq!(format.header_prefix(), None);

        let format = build_record_format(&InputToml::default()).unwrap();
        assert_eq!(format.header_prefix(), Some("feature_0"));
    }

    #[test]
    fn test_unusable_delimiter_rejected() {
        for delimiter in [".", "7", "\u{e9}"] {
            let input = InputToml {
                delimiter: delimiter.to_string(),
                header_prefix: String::new(),
            };
            assert!(build_record_format(&input).is_err(), "{delimiter:?}");
        }
    }

    #[test]
    fn test_query_from_config() {
        let cfg = config("k = 2\nn_features = 3\nquery = [1.0, 2.0, 3.0]\n");
        let q = build_query(&cfg, None, None).unwrap();
        assert_eq!(q.k(), 2);
        assert_eq!(q.features().as_slice(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_precedence() {
        let cfg = config("k = 2\nn_features = 2\nquery = [1.0, 2.0]\n");
        let params = Params {
            k: 4,
            query: vec![5.0, 6.0],
        };
        let q = build_query(&cfg, Some(&params), None).unwrap();
        assert_eq!(q.k(), 4);
        assert_eq!(q.features().as_slice(), [5.0, 6.0]);

        let q = build_query(&cfg, Some(&params), Some(7)).unwrap();
        assert_eq!(q.k(), 7);
    }

    #[test]
    fn test_missing_k_and_query() {
        let err = build_query(&config("query = [1.0]\nn_features = 1\n"), None, None).unwrap_err();
        assert!(err.to_string().contains("no k"));
        let err = build_query(&config("k = 1\n"), None, None).unwrap_err();
        assert!(err.to_string().contains("no query"));
    }

    #[test]
    fn test_query_length_mismatch() {
        let cfg = config("k = 3\nn_features = 6\nquery = [1.0, 2.0]\n");
        let err = build_query(&cfg, None, None).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("query length 2 does not match n_features 6"), "{msg}");
    }

    #[test]
    fn test_n_features_from_params_without_config() {
        let cfg = PartknnConfig::default();
        let params = Params {
            k: 3,
            query: vec![0.5, 1.5],
        };
        assert_eq!(resolve_n_features(&cfg, Some(&params)), 2);
        let q = build_query(&cfg, Some(&params), None).unwrap();
        assert_eq!(q.n_features(), 2);
        assert_eq!(q.k(), 3);
    }

    #[test]
    fn test_n_features_resolution_order() {
        let params = Params {
            k: 1,
            query: vec![0.0; 3],
        };
        assert_eq!(resolve_n_features(&PartknnConfig::default(), None), 6);
        assert_eq!(resolve_n_features(&config("query = [1.0]\n"), None), 1);
        assert_eq!(
            resolve_n_features(&config("n_features = 4\n"), Some(&params)),
            4
        );
    }

    #[test]
    fn test_resolve_k_without_query() {
        let params = Params {
            k: 5,
            query: vec![0.0],
        };
        assert_eq!(resolve_k(&config("k = 2\n"), None, None).unwrap(), 2);
        assert_eq!(resolve_k(&config("k = 2\n"), Some(&params), None).unwrap(), 5);
        assert_eq!(resolve_k(&PartknnConfig::default(), None, Some(9)).unwrap(), 9);
        assert!(resolve_k(&PartknnConfig::default(), None, None).is_err());
    }

    #[test]
    fn test_zero_k_rejected() {
        let cfg = config("n_features = 1\nquery = [0.0]\n");
        let err = build_query(&cfg, None, Some(0)).unwrap_err();
        assert!(format!("{err:#}").contains("k must be >= 1"));
    }

    #[test]
    fn test_resolve_partitions() {
        let run = RunToml::default();
        assert_eq!(resolve_partitions(&run, None).unwrap(), 1);
        assert_eq!(resolve_partitions(&run, Some(6)).unwrap(), 6);
        assert!(resolve_partitions(&run, Some(0)).is_err());
    }
}
