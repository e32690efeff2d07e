//! Command-line interface for `aes-lanes`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use aes_core::{encrypt, Aes128Key, Block};
use aes_lanes::{
    parse_request_line, BatchDriver, BatchSizing, DriverConfig, Execution, Request,
    RequestDispatcher, DEFAULT_LANE_COUNT,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const NIST_KEY: &str = "000102030405060708090a0b0c0d0e0f";
const NIST_PLAIN: &str = "00112233445566778899aabbccddeeff";
const NIST_CIPHER: &str = "69c4e0d86a7b0430d8cdb78070b4c55a";

/// Parallel-lane AES-128 CLI.
#[derive(Parser)]
#[command(
    name = "aes-lanes",
    version,
    author,
    about = "AES-128 over independent parallel lanes"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a single block.
    Encrypt {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Plaintext block as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        plaintext_hex: String,
    },
    /// Encrypt `KEYHEX PLAINTEXTHEX` lines from a file, one ciphertext per line.
    Batch {
        /// Input file; blank lines and `#` comments are skipped.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[command(flatten)]
        driver: DriverArgs,
    },
    /// Serve an `AES,<value>` request file under one key.
    Requests {
        /// Request file, one `TAG,<decimal>` per line.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Print every completion as two 64-bit words.
        #[arg(long, default_value_t = false)]
        print: bool,
        #[command(flatten)]
        driver: DriverArgs,
    },
    /// Verify the FIPS-197 vector and batch/single-lane agreement.
    Check {
        /// Number of random batches to compare.
        #[arg(long, default_value_t = 4)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        driver: DriverArgs,
    },
    /// Encrypt one batch of random keys and plaintexts.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        driver: DriverArgs,
    },
}

#[derive(Args)]
struct DriverArgs {
    /// Lanes per batch.
    #[arg(long, default_value_t = DEFAULT_LANE_COUNT)]
    lanes: usize,
    /// Require every batch to fill all lanes.
    #[arg(long, default_value_t = false)]
    exact: bool,
    /// Run lanes one after another on the main thread.
    #[arg(long, default_value_t = false, conflicts_with = "threads")]
    sequential: bool,
    /// Size of a dedicated worker pool.
    #[arg(long)]
    threads: Option<usize>,
}

impl DriverArgs {
    fn build(&self) -> Result<BatchDriver> {
        let config = DriverConfig {
            lane_count: self.lanes,
            sizing: if self.exact {
                BatchSizing::Exact
            } else {
                BatchSizing::UpTo
            },
            execution: if self.sequential {
                Execution::Sequential
            } else {
                Execution::Parallel {
                    threads: self.threads,
                }
            },
        };
        BatchDriver::with_config(config).context("build batch driver")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Encrypt {
            key_hex,
            plaintext_hex,
        } => cmd_encrypt(&key_hex, &plaintext_hex),
        Commands::Batch { input, driver } => cmd_batch(&input, &driver),
        Commands::Requests {
            input,
            key_hex,
            print,
            driver,
        } => cmd_requests(&input, &key_hex, print, &driver),
        Commands::Check {
            samples,
            seed,
            driver,
        } => cmd_check(samples, seed, &driver),
        Commands::Demo { seed, driver } => cmd_demo(seed, &driver),
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn cmd_encrypt(key_hex: &str, plaintext_hex: &str) -> Result<()> {
    let key = hex::decode(key_hex.trim()).context("decode key hex")?;
    let plaintext = hex::decode(plaintext_hex.trim()).context("decode plaintext hex")?;
    let ciphertext = encrypt(&key, &plaintext)?;
    println!("{}", hex::encode(ciphertext));
    Ok(())
}

fn cmd_batch(input: &PathBuf, args: &DriverArgs) -> Result<()> {
    let driver = args.build()?;
    let text = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;

    let mut pairs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(key), Some(plaintext), None) = (fields.next(), fields.next(), fields.next())
        else {
            bail!("line {}: expected `KEYHEX PLAINTEXTHEX`", idx + 1);
        };
        let key = hex::decode(key).with_context(|| format!("line {}: decode key", idx + 1))?;
        let plaintext = hex::decode(plaintext)
            .with_context(|| format!("line {}: decode plaintext", idx + 1))?;
        pairs.push((key, plaintext));
    }

    info!(
        "encrypting {} pairs in batches of {}",
        pairs.len(),
        driver.lane_count()
    );
    let ciphertexts = driver.encrypt_all(&pairs).context("encrypt batch")?;
    for ciphertext in ciphertexts {
        println!("{}", hex::encode(ciphertext));
    }
    Ok(())
}

fn cmd_requests(input: &PathBuf, key_hex: &str, print: bool, args: &DriverArgs) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let mut dispatcher = RequestDispatcher::new(args.build()?, key);
    let text = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;

    let mut completions = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_request_line(line).with_context(|| format!("line {}", idx + 1))? {
            Request::Aes(value) => completions.extend(dispatcher.submit(value)?),
            Request::Other => skipped += 1,
        }
    }
    completions.extend(dispatcher.finish()?);
    if skipped > 0 {
        warn!("skipped {skipped} requests for other kernels");
    }

    if print {
        for c in &completions {
            let [lo, hi] = c.words();
            println!("{} {} {}", c.value, lo, hi);
        }
    }

    let stats = dispatcher.stats();
    println!("requests: {}", stats.requests);
    println!("batches: {}", stats.batches);
    if let Some(mean) = stats.mean_latency() {
        println!("mean latency: {} us", mean.as_micros());
    }
    Ok(())
}

fn cmd_check(samples: usize, seed: Option<u64>, args: &DriverArgs) -> Result<()> {
    let expected = hex::decode(NIST_CIPHER).context("decode vector")?;
    let key = hex::decode(NIST_KEY).context("decode vector")?;
    let plaintext = hex::decode(NIST_PLAIN).context("decode vector")?;
    if encrypt(&key, &plaintext)?[..] != expected[..] {
        bail!("FIPS-197 known-answer vector mismatch");
    }

    let driver = args.build()?;
    let lanes = driver.lane_count();
    let mut rng = seeded_rng(seed);
    for _ in 0..samples {
        let pairs = random_pairs(&mut rng, lanes);
        let batched = driver.encrypt_batch(&pairs)?;
        for (lane, ((key, plaintext), ciphertext)) in pairs.iter().zip(&batched).enumerate() {
            if &encrypt(key, plaintext)? != ciphertext {
                bail!("lane {lane} disagrees with single-lane encryption");
            }
        }
    }
    println!("ok: known answer and {samples} batches of {lanes} lanes");
    Ok(())
}

fn cmd_demo(seed: Option<u64>, args: &DriverArgs) -> Result<()> {
    let driver = args.build()?;
    let mut rng = seeded_rng(seed);
    let pairs = random_pairs(&mut rng, driver.lane_count());
    let ciphertexts = driver.encrypt_batch(&pairs)?;
    for (lane, ((key, plaintext), ciphertext)) in pairs.iter().zip(&ciphertexts).enumerate() {
        println!(
            "{lane:>3} key {} pt {} ct {}",
            hex::encode(key),
            hex::encode(plaintext),
            hex::encode(ciphertext)
        );
    }
    Ok(())
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Aes128Key::try_from(bytes.as_slice()).context("AES-128 key must be 16 bytes (32 hex characters)")
}

fn random_pairs(rng: &mut impl RngCore, count: usize) -> Vec<(Block, Block)> {
    (0..count)
        .map(|_| {
            let mut key = [0u8; 16];
            let mut plaintext = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut plaintext);
            (key, plaintext)
        })
        .collect()
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
