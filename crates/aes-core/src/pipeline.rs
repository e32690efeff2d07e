//! A single encryption instance driven one transition at a time.

use log::trace;

use crate::block::{block_from_slice, Block};
use crate::cipher::{expand_key_with, ROUNDS};
use crate::error::CipherError;
use crate::key::{Aes128Key, RoundKeys};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::SubstitutionTable;

/// Where a [`CipherPipeline`] is in its fixed sequence of transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Plaintext loaded, schedule expanded, nothing applied yet.
    Initialized,
    /// Round key 0 has been XORed in.
    RoundKeyAdded,
    /// Round `n` (1..=10) has completed.
    Round(u8),
    /// The state holds the ciphertext.
    Done,
}

/// One complete AES-128 encryption: its own state, schedule and S-box copy.
///
/// A pipeline is built per block and consumed by [`CipherPipeline::run`] or
/// [`CipherPipeline::finish`]; nothing is shared with other pipelines.
#[derive(Clone, Debug)]
pub struct CipherPipeline {
    table: SubstitutionTable,
    round_keys: RoundKeys,
    state: Block,
    stage: Stage,
}

impl CipherPipeline {
    /// Validates the raw key and plaintext and prepares a pipeline.
    ///
    /// The key is checked first, so a call with both lengths wrong reports
    /// [`CipherError::InvalidKeyLength`].
    pub fn new(key: &[u8], plaintext: &[u8]) -> Result<Self, CipherError> {
        let key = Aes128Key::try_from(key)?;
        let block = block_from_slice(plaintext)?;
        Ok(Self::from_parts(&key, &block))
    }

    /// Prepares a pipeline from already validated inputs.
    pub fn from_parts(key: &Aes128Key, plaintext: &Block) -> Self {
        let table = SubstitutionTable::new();
        let round_keys = expand_key_with(key, &table);
        Self::with_schedule(round_keys, table, plaintext)
    }

    /// Prepares a pipeline around an already expanded schedule.
    pub fn with_schedule(
        round_keys: RoundKeys,
        table: SubstitutionTable,
        plaintext: &Block,
    ) -> Self {
        Self {
            table,
            round_keys,
            state: *plaintext,
            stage: Stage::Initialized,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current contents of the state matrix.
    pub fn state(&self) -> &Block {
        &self.state
    }

    /// Applies the next transition and returns the stage reached.
    ///
    /// Stepping a finished pipeline leaves it untouched.
    pub fn step(&mut self) -> Stage {
        self.stage = match self.stage {
            Stage::Initialized => {
                add_round_key(&mut self.state, self.round_keys.get(0));
                Stage::RoundKeyAdded
            }
            Stage::RoundKeyAdded => {
                self.full_round(1);
                Stage::Round(1)
            }
            Stage::Round(n) if (n as usize) < ROUNDS - 1 => {
                self.full_round(n as usize + 1);
                Stage::Round(n + 1)
            }
            Stage::Round(n) if (n as usize) == ROUNDS - 1 => {
                sub_bytes(&mut self.state, &self.table);
                shift_rows(&mut self.state);
                add_round_key(&mut self.state, self.round_keys.get(ROUNDS));
                Stage::Round(ROUNDS as u8)
            }
            Stage::Round(_) => Stage::Done,
            Stage::Done => Stage::Done,
        };
        trace!("pipeline stage {:?}", self.stage);
        self.stage
    }

    /// Drives the remaining transitions and returns the ciphertext.
    pub fn run(mut self) -> Block {
        while self.step() != Stage::Done {}
        self.state
    }

    /// Returns the ciphertext if the pipeline has reached [`Stage::Done`],
    /// otherwise hands the pipeline back.
    pub fn finish(self) -> Result<Block, Self> {
        if self.stage == Stage::Done {
            Ok(self.state)
        } else {
            Err(self)
        }
    }

    fn full_round(&mut self, round: usize) {
        sub_bytes(&mut self.state, &self.table);
        shift_rows(&mut self.state);
        mix_columns(&mut self.state);
        add_round_key(&mut self.state, self.round_keys.get(round));
    }
}
