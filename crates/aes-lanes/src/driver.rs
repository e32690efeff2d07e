//! Batched encryption over independent lanes.

use aes_core::{block_from_slice, Aes128Key, Block, CipherError, CipherPipeline};
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{BatchSizing, DriverConfig, Execution};
use crate::error::BatchError;

/// One validated lane input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lane {
    /// Key for this lane only.
    pub key: Aes128Key,
    /// Plaintext block for this lane only.
    pub plaintext: Block,
}

impl Lane {
    /// Validates raw key and plaintext bytes.
    pub fn from_slices(key: &[u8], plaintext: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            key: Aes128Key::try_from(key)?,
            plaintext: block_from_slice(plaintext)?,
        })
    }

    fn encrypt(&self) -> Block {
        CipherPipeline::from_parts(&self.key, &self.plaintext).run()
    }
}

/// Runs up to `lane_count` independent encryptions per batch.
///
/// Each lane gets a fresh [`CipherPipeline`], so no schedule, state or table
/// is shared between lanes. Output position `i` always belongs to input
/// position `i`, whatever order the lanes actually ran in.
pub struct BatchDriver {
    config: DriverConfig,
    pool: Option<ThreadPool>,
}

impl BatchDriver {
    /// Creates a driver with `lane_count` lanes and default settings.
    pub fn new(lane_count: usize) -> Result<Self, BatchError> {
        Self::with_config(DriverConfig::with_lanes(lane_count))
    }

    /// Creates a driver with explicit configuration.
    pub fn with_config(config: DriverConfig) -> Result<Self, BatchError> {
        if config.lane_count == 0 {
            return Err(BatchError::InvalidLaneCount);
        }
        let pool = match config.execution {
            Execution::Parallel {
                threads: Some(threads),
            } => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            _ => None,
        };
        Ok(Self { config, pool })
    }

    /// Configured lane count.
    pub fn lane_count(&self) -> usize {
        self.config.lane_count
    }

    /// Configuration the driver was built with.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Encrypts one batch of raw `(key, plaintext)` pairs.
    ///
    /// All pairs are validated before any lane runs. The first malformed pair
    /// (lowest index) is reported and no ciphertext is produced at all.
    pub fn encrypt_batch<K, P>(&self, pairs: &[(K, P)]) -> Result<Vec<Block>, BatchError>
    where
        K: AsRef<[u8]>,
        P: AsRef<[u8]>,
    {
        self.check_size(pairs.len())?;
        let lanes = validate(pairs)?;
        Ok(self.run(&lanes))
    }

    /// Encrypts one batch, confining each malformed pair to its own slot.
    ///
    /// Valid lanes always receive their ciphertext. Only a batch that does not
    /// fit the lane count fails as a whole.
    pub fn encrypt_batch_isolated<K, P>(
        &self,
        pairs: &[(K, P)],
    ) -> Result<Vec<Result<Block, CipherError>>, BatchError>
    where
        K: AsRef<[u8]> + Sync,
        P: AsRef<[u8]> + Sync,
    {
        self.check_size(pairs.len())?;
        debug!("encrypting {} isolated lanes", pairs.len());
        Ok(self.map_lanes(pairs, |(key, plaintext)| {
            Lane::from_slices(key.as_ref(), plaintext.as_ref()).map(|lane| lane.encrypt())
        }))
    }

    /// Encrypts one batch of already validated lanes.
    pub fn encrypt_lanes(&self, lanes: &[Lane]) -> Result<Vec<Block>, BatchError> {
        self.check_size(lanes.len())?;
        Ok(self.run(lanes))
    }

    /// Encrypts any number of pairs, `lane_count` at a time.
    ///
    /// Everything is validated up front; a reported lane index refers to the
    /// position in `pairs`. With [`BatchSizing::Exact`] the input length must
    /// be a multiple of the lane count, otherwise nothing is encrypted.
    pub fn encrypt_all<K, P>(&self, pairs: &[(K, P)]) -> Result<Vec<Block>, BatchError>
    where
        K: AsRef<[u8]>,
        P: AsRef<[u8]>,
    {
        let expected = self.config.lane_count;
        if self.config.sizing == BatchSizing::Exact && pairs.len() % expected != 0 {
            return Err(BatchError::LaneCountMismatch {
                expected,
                actual: pairs.len(),
            });
        }
        let lanes = validate(pairs)?;

        let mut out = Vec::with_capacity(lanes.len());
        for batch in lanes.chunks(expected) {
            out.extend(self.run(batch));
        }
        Ok(out)
    }

    fn check_size(&self, actual: usize) -> Result<(), BatchError> {
        let expected = self.config.lane_count;
        let fits = match self.config.sizing {
            BatchSizing::UpTo => actual <= expected,
            BatchSizing::Exact => actual == expected,
        };
        if fits {
            Ok(())
        } else {
            Err(BatchError::LaneCountMismatch { expected, actual })
        }
    }

    fn run(&self, lanes: &[Lane]) -> Vec<Block> {
        debug!(
            "encrypting {} of {} lanes ({:?})",
            lanes.len(),
            self.config.lane_count,
            self.config.execution
        );
        self.map_lanes(lanes, Lane::encrypt)
    }

    // Indexed collect writes each output slot exactly once, in input order.
    fn map_lanes<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match (&self.config.execution, &self.pool) {
            (Execution::Sequential, _) => items.iter().map(f).collect(),
            (Execution::Parallel { .. }, Some(pool)) => {
                pool.install(|| items.par_iter().map(&f).collect())
            }
            (Execution::Parallel { .. }, None) => items.par_iter().map(f).collect(),
        }
    }
}

// Reports the lowest-index malformed pair.
fn validate<K, P>(pairs: &[(K, P)]) -> Result<Vec<Lane>, BatchError>
where
    K: AsRef<[u8]>,
    P: AsRef<[u8]>,
{
    pairs
        .iter()
        .enumerate()
        .map(|(lane, (key, plaintext))| {
            Lane::from_slices(key.as_ref(), plaintext.as_ref())
                .map_err(|source| BatchError::Lane { lane, source })
        })
        .collect()
}
