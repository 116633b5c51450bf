//! Worker-pool orchestration — fan lines out to parser tasks, fan records in.
//!
//! The parser itself is pure and synchronous; throughput comes from running
//! many independent calls at once. Lines are dispatched round-robin to a
//! fixed set of workers and every result funnels into one output channel.
//! Output order follows completion, not input order.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::parser::metrics::ParseMetrics;
use crate::parser::{parse, LogRecord, ParseError};

/// The pool's workers are gone, either after `shutdown` or because the
/// result receiver was dropped.
#[derive(Debug, Error)]
#[error("Parse pool is shut down")]
pub struct PoolClosed;

pub struct ParsePool {
    inputs: Vec<mpsc::Sender<Bytes>>,
    next: usize,
    workers: Vec<JoinHandle<()>>,
    metrics: Arc<ParseMetrics>,
}

impl ParsePool {
    /// Spawn `workers` parser tasks. Returns the pool handle and the fan-in
    /// receiver carrying one result per dispatched line.
    pub fn spawn(
        workers: usize,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Result<LogRecord, ParseError>>) {
        let metrics = Arc::new(ParseMetrics::new());
        let (out_tx, out_rx) = mpsc::channel(capacity);
        let mut inputs = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for _ in 0..workers {
            let (in_tx, mut in_rx) = mpsc::channel::<Bytes>(capacity);
            let out = out_tx.clone();
            let metrics = Arc::clone(&metrics);
            handles.push(tokio::spawn(async move {
                while let Some(line) = in_rx.recv().await {
                    metrics.record_line();
                    let result = parse(&line);
                    match &result {
                        Ok(_) => metrics.record_success(),
                        Err(err) => metrics.record_failure(err),
                    }
                    if out.send(result).await.is_err() {
                        // Receiver gone; nobody wants the rest.
                        break;
                    }
                }
            }));
            inputs.push(in_tx);
        }

        (
            Self {
                inputs,
                next: 0,
                workers: handles,
                metrics,
            },
            out_rx,
        )
    }

    /// Hand one line to the next worker in rotation. Backpressure applies:
    /// the call waits while that worker's queue is full.
    pub async fn dispatch(&mut self, line: Bytes) -> Result<(), PoolClosed> {
        let target = self.next % self.inputs.len();
        self.next = self.next.wrapping_add(1);
        self.inputs[target]
            .send(line)
            .await
            .map_err(|_| PoolClosed)
    }

    /// Counters shared with the workers.
    pub fn metrics(&self) -> Arc<ParseMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Close the inputs and wait for the workers to drain their queues.
    /// The fan-in receiver sees the end of the stream once the last worker
    /// exits.
    pub async fn shutdown(self) {
        drop(self.inputs);
        for handle in self.workers {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &[u8] = b"2015-05-13T23:39:43.945958Z my-loadbalancer 192.168.131.39:2817 10.0.0.1:80 0.000073 0.001048 0.000057 200 200 0 29 \"GET http://www.example.com:80/ HTTP/1.1\" \"curl/7.38.0\" - -";

    #[tokio::test]
    async fn test_pool_parses_all_lines() {
        let (mut pool, mut results) = ParsePool::spawn(3, 16);
        let metrics = pool.metrics();

        for _ in 0..10 {
            pool.dispatch(Bytes::from_static(LINE)).await.unwrap();
        }
        pool.shutdown().await;

        let mut records = 0;
        while let Some(result) = results.recv().await {
            assert_eq!(result.unwrap().name, "my-loadbalancer");
            records += 1;
        }
        assert_eq!(records, 10);

        let snap = metrics.snapshot();
        assert_eq!(snap.lines, 10);
        assert_eq!(snap.records, 10);
        assert_eq!(snap.failures, 0);
    }

    #[tokio::test]
    async fn test_pool_reports_malformed_lines() {
        let (mut pool, mut results) = ParsePool::spawn(2, 16);
        let metrics = pool.metrics();

        pool.dispatch(Bytes::from_static(LINE)).await.unwrap();
        pool.dispatch(Bytes::from_static(b"garbage")).await.unwrap();
        pool.shutdown().await;

        let mut ok = 0;
        let mut failed = 0;
        while let Some(result) = results.recv().await {
            match result {
                Ok(_) => ok += 1,
                Err(err) => {
                    assert!(matches!(err, ParseError::Truncated(_)));
                    failed += 1;
                }
            }
        }
        assert_eq!((ok, failed), (1, 1));

        let snap = metrics.snapshot();
        assert_eq!(snap.truncated, 1);
        assert_eq!(snap.failures, 1);
    }

    #[tokio::test]
    async fn test_dispatch_after_receiver_dropped_fails() {
        let (mut pool, results) = ParsePool::spawn(1, 1);
        drop(results);

        // The worker exits once its pending send fails; dispatch then has
        // no live input to land on.
        let mut closed = false;
        for _ in 0..8 {
            if pool.dispatch(Bytes::from_static(LINE)).await.is_err() {
                closed = true;
                break;
            }
        }
        assert!(closed);
        pool.shutdown().await;
    }
}
