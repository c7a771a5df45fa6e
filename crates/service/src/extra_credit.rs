//! Small exercises run by the `extra_credit` binary: checked conversion out
//! of a tagged value, a command-driven background worker, and a round trip
//! through the concurrent map.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::storage::{CacheValue, ConcurrentMap};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker has already stopped")]
    Stopped,
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Add `addend` to `value` if it holds an integer.
pub fn cast_and_add(value: &CacheValue, addend: i64) -> Option<i64> {
    value.as_int().map(|n| n + addend)
}

pub fn swap_values<T>(a: &mut T, b: &mut T) {
    std::mem::swap(a, b);
}

/// Write a text value and read it straight back.
pub fn cache_round_trip(
    cache: &ConcurrentMap<CacheValue>,
    key: &str,
    text: &str,
) -> Option<String> {
    cache.write(key, CacheValue::from(text));
    cache.read(key).and_then(|v| v.as_text().map(str::to_string))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Double,
    Print,
    Quit,
}

/// What a worker saw before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub value: i64,
    /// Value at every `Print`, in order.
    pub printed: Vec<i64>,
}

pub struct WorkerHandle {
    tx: mpsc::Sender<Command>,
    join: JoinHandle<WorkerReport>,
}

/// Spawn a worker owning an integer that starts at `initial`.
///
/// Commands are applied in the order they are sent. The worker stops on
/// `Quit` or once every sender has been dropped.
pub fn spawn_worker(initial: i64) -> WorkerHandle {
    let (tx, mut rx) = mpsc::channel::<Command>(1);
    let join = tokio::spawn(async move {
        let mut report = WorkerReport { value: initial, printed: Vec::new() };
        while let Some(cmd) = rx.recv().await {
            match cmd {
                Command::Double => {
                    report.value = report.value.saturating_mul(2);
                    debug!(value = report.value, "worker doubled");
                }
                Command::Print => {
                    info!(value = report.value, "Int is {}", report.value);
                    report.printed.push(report.value);
                }
                Command::Quit => {
                    info!(value = report.value, "worker exiting");
                    break;
                }
            }
        }
        report
    });
    WorkerHandle { tx, join }
}

impl WorkerHandle {
    pub async fn send(&self, cmd: Command) -> Result<(), WorkerError> {
        self.tx.send(cmd).await.map_err(|_| WorkerError::Stopped)
    }

    /// Send `Quit` and wait for the worker's report.
    pub async fn quit(self) -> Result<WorkerReport, WorkerError> {
        // A worker that already stopped still has a report to collect.
        let _ = self.send(Command::Quit).await;
        Ok(self.join.await?)
    }
}
