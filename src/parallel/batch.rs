//! Batch planning for parallel trials.
//!
//! Trials are split into batches whose boundaries depend only on the trial count and the
//! batch size, never on how many workers are available. Each batch carries its own seed,
//! so a parallel aggregate is reproducible across machines.

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use battlesim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// A contiguous run of trial indices `[start, end)` with the seed for its RNG stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialBatch {
    pub index: u32,
    pub start: u32,
    pub end: u32,
    pub seed: u64,
}

impl TrialBatch {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Plans batches of at most `batch_size` trials. Batch `i` is seeded with `seed + i`
/// (wrapping).
pub fn plan_trial_batches(trials: u32, batch_size: u32, seed: u64) -> Vec<TrialBatch> {
    let batch_size = batch_size.max(1);
    let num_batches = trials.div_ceil(batch_size) as usize;
    batch_ranges(trials as usize, num_batches)
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| TrialBatch {
            index: index as u32,
            start: start as u32,
            end: end as u32,
            seed: seed.wrapping_add(index as u64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_ranges_even_split() {
        let r = batch_ranges(100, 4);
        assert_eq!(r, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
    }

    #[test]
    fn batch_ranges_with_remainder() {
        let r = batch_ranges(10, 3);
        assert_eq!(r, vec![(0, 4), (4, 7), (7, 10)]);
    }

    #[test]
    fn batch_ranges_more_batches_than_items() {
        let r = batch_ranges(3, 10);
        assert_eq!(r.len(), 3);
        assert_eq!(r, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn batch_ranges_empty() {
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }

    #[test]
    fn trial_batches_cover_every_trial_once() {
        let batches = plan_trial_batches(130, 64, 10);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].start, 0);
        assert_eq!(batches[2].end, 130);
        for pair in batches.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(batches.iter().all(|batch| batch.len() <= 64 && !batch.is_empty()));
        let seeds: Vec<u64> = batches.iter().map(|batch| batch.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12]);
    }

    #[test]
    fn batch_seeds_wrap() {
        let batches = plan_trial_batches(2, 1, u64::MAX);
        assert_eq!(batches[0].seed, u64::MAX);
        assert_eq!(batches[1].seed, 0);
    }

    #[test]
    fn no_trials_no_batches() {
        assert!(plan_trial_batches(0, 64, 1).is_empty());
    }
}
