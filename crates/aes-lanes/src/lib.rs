//! Batched AES-128 over independent lanes.
//!
//! [`BatchDriver`] runs up to N `(key, plaintext)` pairs per batch, each in
//! its own [`aes_core::CipherPipeline`], and returns the ciphertexts in input
//! order. [`RequestDispatcher`] sits in front of it for workloads that arrive
//! one 64-bit value at a time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod dispatch;
mod driver;
mod error;
mod request;

pub use config::{BatchSizing, DriverConfig, Execution, DEFAULT_LANE_COUNT};
pub use dispatch::{Completion, DispatchStats, RequestDispatcher};
pub use driver::{BatchDriver, Lane};
pub use error::BatchError;
pub use request::{decode_words, encode_request, parse_request_line, Request, RequestParseError};
