//! Queueing of single-word requests into lane-sized batches.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use aes_core::{Aes128Key, Block};
use log::debug;

use crate::config::BatchSizing;
use crate::driver::{BatchDriver, Lane};
use crate::error::BatchError;
use crate::request::{decode_words, encode_request};

/// A served request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Value that was submitted.
    pub value: u64,
    /// Its ciphertext.
    pub ciphertext: Block,
    /// Time between submission and the batch finishing.
    pub latency: Duration,
}

impl Completion {
    /// Ciphertext as the two words the host reads back.
    pub fn words(&self) -> [u64; 2] {
        decode_words(&self.ciphertext)
    }
}

/// Counters accumulated by a [`RequestDispatcher`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Requests served.
    pub requests: u64,
    /// Batches run, padded or not.
    pub batches: u64,
    /// Sum of every request's latency.
    pub total_latency: Duration,
}

impl DispatchStats {
    /// Mean latency over served requests.
    pub fn mean_latency(&self) -> Option<Duration> {
        if self.requests == 0 {
            return None;
        }
        let nanos = self.total_latency.as_nanos() / u128::from(self.requests);
        Some(Duration::new(
            (nanos / 1_000_000_000) as u64,
            (nanos % 1_000_000_000) as u32,
        ))
    }
}

#[derive(Debug)]
struct Pending {
    value: u64,
    received: Instant,
}

/// Encrypts queued request values under one key, a full batch at a time.
///
/// With [`BatchSizing::Exact`] a short final batch is padded with zero
/// requests; their outputs are dropped.
pub struct RequestDispatcher {
    driver: BatchDriver,
    key: Aes128Key,
    pending: VecDeque<Pending>,
    stats: DispatchStats,
}

impl RequestDispatcher {
    /// Creates a dispatcher that encrypts every request under `key`.
    pub fn new(driver: BatchDriver, key: Aes128Key) -> Self {
        Self {
            driver,
            key,
            pending: VecDeque::new(),
            stats: DispatchStats::default(),
        }
    }

    /// Number of queued, unserved requests.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Counters so far.
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Queues a request, running a batch once enough are waiting.
    pub fn submit(&mut self, value: u64) -> Result<Vec<Completion>, BatchError> {
        self.pending.push_back(Pending {
            value,
            received: Instant::now(),
        });
        if self.pending.len() >= self.driver.lane_count() {
            self.run_batch()
        } else {
            Ok(Vec::new())
        }
    }

    /// Serves everything still queued.
    pub fn finish(&mut self) -> Result<Vec<Completion>, BatchError> {
        let mut done = Vec::with_capacity(self.pending.len());
        while !self.pending.is_empty() {
            done.extend(self.run_batch()?);
        }
        Ok(done)
    }

    fn run_batch(&mut self) -> Result<Vec<Completion>, BatchError> {
        let lanes = self.driver.lane_count();
        let take = self.pending.len().min(lanes);

        let width = match self.driver.config().sizing {
            BatchSizing::Exact => lanes,
            BatchSizing::UpTo => take,
        };
        let inputs: Vec<Lane> = (0..width)
            .map(|i| Lane {
                key: self.key,
                plaintext: encode_request(self.pending.get(i).map_or(0, |p| p.value)),
            })
            .collect();
        debug!("dispatching {} requests in {} lanes", take, inputs.len());

        // Requests stay queued until their batch has succeeded.
        let ciphertexts = self.driver.encrypt_lanes(&inputs)?;
        let batch: Vec<Pending> = self.pending.drain(..take).collect();
        let finished = Instant::now();

        self.stats.batches += 1;
        let completions: Vec<Completion> = batch
            .into_iter()
            .zip(ciphertexts)
            .map(|(req, ciphertext)| Completion {
                value: req.value,
                ciphertext,
                latency: finished.duration_since(req.received),
            })
            .collect();
        for c in &completions {
            self.stats.requests += 1;
            self.stats.total_latency += c.latency;
        }
        Ok(completions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriverConfig;
    use aes_core::encrypt_parts;

    const KEY: [u8; 16] = [
        0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf1, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef,
        0x01,
    ];

    fn expected(value: u64) -> Block {
        encrypt_parts(&Aes128Key::from(KEY), &encode_request(value)).unwrap()
    }

    #[test]
    fn batch_runs_when_lanes_fill() {
        let driver = BatchDriver::new(3).unwrap();
        let mut dispatcher = RequestDispatcher::new(driver, Aes128Key::from(KEY));

        assert!(dispatcher.submit(1).unwrap().is_empty());
        assert!(dispatcher.submit(2).unwrap().is_empty());
        let done = dispatcher.submit(3).unwrap();

        assert_eq!(done.len(), 3);
        assert_eq!(dispatcher.pending(), 0);
        for (c, value) in done.iter().zip([1u64, 2, 3]) {
            assert_eq!(c.value, value);
            assert_eq!(c.ciphertext, expected(value));
        }
        assert_eq!(dispatcher.stats().batches, 1);
    }

    #[test]
    fn padded_final_batch_returns_only_real_requests() {
        let driver = BatchDriver::with_config(DriverConfig {
            sizing: BatchSizing::Exact,
            ..DriverConfig::with_lanes(4)
        })
        .unwrap();
        let mut dispatcher = RequestDispatcher::new(driver, Aes128Key::from(KEY));

        let mut done = Vec::new();
        for value in 10..16u64 {
            done.extend(dispatcher.submit(value).unwrap());
        }
        assert_eq!(done.len(), 4);
        done.extend(dispatcher.finish().unwrap());

        let values: Vec<u64> = done.iter().map(|c| c.value).collect();
        assert_eq!(values, (10..16).collect::<Vec<_>>());
        for c in &done {
            assert_eq!(c.ciphertext, expected(c.value));
            assert_eq!(c.words(), decode_words(&expected(c.value)));
        }

        let stats = dispatcher.stats();
        assert_eq!(stats.requests, 6);
        assert_eq!(stats.batches, 2);
        assert!(stats.mean_latency().is_some());
    }

    #[test]
    fn mean_latency_survives_large_request_counts() {
        let stats = DispatchStats {
            requests: u64::from(u32::MAX) + 10,
            batches: 1,
            total_latency: Duration::from_secs(u64::from(u32::MAX) + 10),
        };
        assert_eq!(stats.mean_latency(), Some(Duration::from_secs(1)));

        let stats = DispatchStats {
            requests: 4,
            batches: 1,
            total_latency: Duration::from_millis(10),
        };
        assert_eq!(stats.mean_latency(), Some(Duration::from_micros(2500)));
    }

    #[test]
    fn requests_leave_queue_only_when_served() {
        let driver = BatchDriver::new(2).unwrap();
        let mut dispatcher = RequestDispatcher::new(driver, Aes128Key::from(KEY));
        for value in 0..3u64 {
            dispatcher.submit(value).unwrap();
        }
        assert_eq!(dispatcher.pending(), 1);
        assert_eq!(dispatcher.stats().requests, 2);

        let rest = dispatcher.finish().unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].value, 2);
        assert_eq!(rest[0].ciphertext, expected(2));
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn finish_on_empty_queue_is_a_no_op() {
        let driver = BatchDriver::new(2).unwrap();
        let mut dispatcher = RequestDispatcher::new(driver, Aes128Key::from(KEY));
        assert!(dispatcher.finish().unwrap().is_empty());
        assert_eq!(dispatcher.stats().mean_latency(), None);
    }
}
