//! Classify command: rank every partition, merge, and vote in one process.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use partknn_io::{partitions, read_records, write_result};
use partknn_knn::classify;

use crate::cli::ClassifyArgs;
use crate::config::load_query;
use crate::convert;
use crate::output;

/// Run the single-process classification pipeline.
pub fn run(args: ClassifyArgs) -> Result<()> {
    let _cmd = info_span!("classify").entered();

    // 1. Resolve configuration
    let (config, query) = load_query(&args.query)?;
    let format = convert::build_record_format(&config.input)?;
    let n_partitions = convert::resolve_partitions(&config.run, args.partitions)?;
    info!(
        k = query.k(),
        n_features = query.n_features(),
        n_partitions,
        "configuration resolved"
    );

    // 2. Read and partition the training data
    let data = read_records(&args.input[..], &format).context("failed to read training data")?;
    let parts = partitions(&data, n_partitions, &format, query.n_features())?;

    // 3. Rank, merge, vote
    let result = in_pool(config.run.threads, || classify(parts, &query))?
        .context("classification failed")?;

    // 4. Write outputs
    write_result(args.output.as_deref(), &result, args.neighbors)?;
    if let Some(ref path) = args.json {
        output::write_report(path, &result, query.k())?;
    }
    Ok(())
}

/// Runs `f` on a dedicated pool of `threads` workers, or on the global pool
/// when `threads` is 0.
fn in_pool<R, F>(threads: usize, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if threads == 0 {
        return Ok(f());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("failed to build thread pool")?;
    Ok(pool.install(f))
}
