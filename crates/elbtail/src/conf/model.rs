//! Model — Config and defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access-log file to read. `None` reads stdin.
    pub input: Option<PathBuf>,
    /// Parser tasks running in parallel.
    pub workers: usize,
    /// Depth of the per-worker and fan-in channels.
    pub channel_capacity: usize,
    /// Stop at the first malformed line instead of skipping and counting it.
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            workers: 4,
            channel_capacity: 1024,
            fail_fast: false,
        }
    }
}
