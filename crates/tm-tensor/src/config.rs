/// Default minimum output size, in elements, before the parallel copy path
/// is worth its scheduling overhead.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Tuning knobs for the concatenation kernel.
///
/// Results never depend on these settings, only how the copy is scheduled.
/// Without the `parallel` cargo feature every copy is serial and the
/// threshold is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcatConfig {
    /// Minimum number of output elements before rows are copied in parallel.
    /// `None` keeps every copy on the calling thread.
    pub parallel_threshold: Option<usize>,
}

impl ConcatConfig {
    /// Configuration that always copies on the calling thread.
    pub fn serial() -> Self {
        ConcatConfig {
            parallel_threshold: None,
        }
    }

    /// Override the parallel threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Whether an output of `numel` elements split into `rows` outer rows
    /// should be copied in parallel.
    pub fn use_parallel(&self, numel: usize, rows: usize) -> bool {
        match self.parallel_threshold {
            Some(threshold) => cfg!(feature = "parallel") && rows > 1 && numel >= threshold,
            None => false,
        }
    }
}

impl Default for ConcatConfig {
    fn default() -> Self {
        ConcatConfig {
            parallel_threshold: Some(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}
