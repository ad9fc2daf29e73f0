//! Rank command: one data file is one partition; writes its candidate file.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use partknn_io::{PartitionRows, RecordStream, write_candidates};
use partknn_knn::rank_partition;

use crate::cli::RankArgs;
use crate::config::load_query;
use crate::convert;

/// Run the ranking phase for a single partition.
pub fn run(args: RankArgs) -> Result<()> {
    let _cmd = info_span!("rank").entered();

    let (config, query) = load_query(&args.query)?;
    let format = convert::build_record_format(&config.input)?;

    // Records are streamed; the partition is never held in memory.
    let mut stream =
        RecordStream::open(&args.input, &format).context("failed to open partition data")?;
    let rows = PartitionRows::new(stream.by_ref(), &format, query.n_features());
    let output = rank_partition(rows, &query);
    stream.finish().context("failed to read partition data")?;
    info!(
        n_candidates = output.candidates().len(),
        accepted = output.stats().accepted,
        "partition ranked"
    );

    write_candidates(&args.output, &output)
        .with_context(|| format!("failed to write candidates: {}", args.output.display()))?;
    Ok(())
}
