//! Rayon thread pool configuration for trial batches.
//!
//! Use [WorkerPool::install] to run a parallel aggregate with a fixed number of threads, or
//! rely on Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

use crate::error::SimResult;

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers)
    /// is 0, uses the global Rayon pool. Otherwise builds a temporary pool with that many
    /// threads.
    pub fn install<F, R>(&self, f: F) -> SimResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;
        Ok(pool.install(f))
    }
}
