//! Run — wire the reader into the parse pool and emit records as JSON lines.

use std::io::{BufWriter, Write};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::conf::Config;
use crate::pipeline::ParsePool;
use crate::reader::{self, ReadError};

/// Read lines from the configured input, parse them on the pool, and write
/// one JSON object per record to stdout.
///
/// Malformed lines are counted and skipped (or, with `fail_fast`, returned
/// as the run's error). I/O failures always abort.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines: BoxStream<'static, Result<Bytes, ReadError>> = match &config.input {
        Some(path) => reader::lines(reader::open_file(path).await?).boxed(),
        None => reader::lines(reader::stdin()).boxed(),
    };

    let (mut pool, mut results) = ParsePool::spawn(config.workers, config.channel_capacity);
    let metrics = pool.metrics();
    let fail_fast = config.fail_fast;

    // Fan-in runs beside the dispatch loop; with a single task the output
    // channel would fill and deadlock the workers.
    let writer = tokio::spawn(async move {
        let mut out = BufWriter::new(std::io::stdout());
        while let Some(result) = results.recv().await {
            match result {
                Ok(record) => {
                    serde_json::to_writer(&mut out, &record)?;
                    out.write_all(b"\n")?;
                }
                Err(err) => {
                    if fail_fast {
                        return Err(err.into());
                    }
                    warn!("Skipping malformed line: {}", err);
                }
            }
        }
        out.flush()?;
        Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
    });

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if pool.dispatch(line).await.is_err() {
            // The writer bailed out and took the workers with it; its
            // error surfaces below.
            break;
        }
    }

    pool.shutdown().await;
    writer
        .await?
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    let snap = metrics.snapshot();
    info!(
        "Parsed {} records from {} lines ({} malformed)",
        snap.records, snap.lines, snap.failures
    );

    Ok(())
}
