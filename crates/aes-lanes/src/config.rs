//! Driver configuration.

/// Lane count used by the reference accelerator build.
pub const DEFAULT_LANE_COUNT: usize = 24;

/// How a batch's length relates to the configured lane count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchSizing {
    /// Any batch of at most `lane_count` pairs is accepted.
    #[default]
    UpTo,
    /// Every batch must hold exactly `lane_count` pairs.
    Exact,
}

/// How lanes are scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    /// One lane after another on the calling thread.
    Sequential,
    /// Lanes run on rayon workers.
    Parallel {
        /// Size of a dedicated pool; `None` uses rayon's global pool.
        threads: Option<usize>,
    },
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Parallel { threads: None }
    }
}

/// Configuration fixed when a [`BatchDriver`](crate::BatchDriver) is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Number of independent lanes per batch.
    pub lane_count: usize,
    /// Batch length policy.
    pub sizing: BatchSizing,
    /// Scheduling of lanes within a batch.
    pub execution: Execution,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            sizing: BatchSizing::default(),
            execution: Execution::default(),
        }
    }
}

impl DriverConfig {
    /// Default configuration with `lane_count` lanes.
    pub fn with_lanes(lane_count: usize) -> Self {
        Self {
            lane_count,
            ..Self::default()
        }
    }
}
