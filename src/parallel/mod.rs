pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, plan_trial_batches, TrialBatch};
pub use pool::WorkerPool;
