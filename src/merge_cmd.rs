//! Merge command: combine candidate files and vote on the label.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use partknn_io::{read_candidates, write_result};
use partknn_knn::{Classification, merge_outputs};

use crate::cli::MergeArgs;
use crate::config::load_sources;
use crate::convert;
use crate::output;

/// Run the merge and vote phases over the listed candidate files.
pub fn run(args: MergeArgs) -> Result<()> {
    let _cmd = info_span!("merge").entered();

    // Only K and the feature count matter here; no query vector is needed.
    let (config, params) = load_sources(&args.query)?;
    let k = convert::resolve_k(&config, params.as_ref(), args.query.k)?;
    let n_features = convert::resolve_n_features(&config, params.as_ref());

    // Every listed file must load before merging starts.
    let outputs = args
        .input
        .iter()
        .map(|path| {
            read_candidates(path)
                .with_context(|| format!("failed to read candidates: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(n_files = outputs.len(), "candidate files loaded");

    let merged = merge_outputs(k, outputs).context("merge failed")?;
    let result = Classification::from_merge(merged, n_features)
        .context("classification failed")?;
    info!(label = result.label(), "merge complete");

    write_result(args.output.as_deref(), &result, args.neighbors)?;
    if let Some(ref path) = args.json {
        output::write_report(path, &result, k)?;
    }
    Ok(())
}
