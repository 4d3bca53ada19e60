//! `tern` — verifiable-log client toolkit.
//!
//! Binary entrypoint tying the tern crates together behind two subcommands:
//!
//! ```text
//! tern demo                    # submit records to an in-process log and
//!                              # prove their inclusion end to end
//! tern demo -n 5 -c tern.toml  # five records, custom config
//! tern verify --name thing-1 --leaf-index 2 --tree-size 4 \
//!     --root <hex> <sibling hex> <sibling hex>
//!                              # check an audit path offline
//! ```

mod config;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tern_engine::{Coordinator, EngineConfig, GetOutcome, WaitOutcome};
use tern_log::MemoryLog;
use tern_merkle::{hash_leaf, verify_inclusion};
use tern_types::{Extra, LeafHash, LeafRecord};
use tokio::time::{interval, sleep};
use tracing::{info, warn};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "tern", version, about = "Verifiable-log client toolkit")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit records to an in-process log and prove their inclusion.
    Demo {
        /// Number of records to submit. Overrides the config value.
        #[arg(short = 'n', long)]
        records: Option<usize>,

        /// Per-record deadline for the inclusion wait, in milliseconds.
        ///
        /// Without a deadline the wait polls until the proof verifies.
        #[arg(long)]
        deadline_ms: Option<u64>,
    },

    /// Verify an inclusion proof offline from hex-encoded inputs.
    Verify {
        /// The leaf hash, hex-encoded (32 bytes).
        #[arg(long, conflicts_with = "name")]
        leaf_hash: Option<String>,

        /// Compute the leaf hash from a record name instead.
        #[arg(long)]
        name: Option<String>,

        /// The leaf's position in the tree.
        #[arg(long)]
        leaf_index: u64,

        /// The tree size the proof was issued for.
        #[arg(long)]
        tree_size: u64,

        /// The trusted root hash, hex-encoded (32 bytes).
        #[arg(long)]
        root: String,

        /// Audit path entries, leaf-to-root, hex-encoded.
        path: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.log.level);

    match cli.command {
        Commands::Demo {
            records,
            deadline_ms,
        } => {
            let count = records.unwrap_or_else(|| config.demo_records());
            let deadline = deadline_ms.map(Duration::from_millis);
            run_demo(&config, count, deadline).await
        }
        Commands::Verify {
            leaf_hash,
            name,
            leaf_index,
            tree_size,
            root,
            path,
        } => run_verify(leaf_hash, name, leaf_index, tree_size, &root, &path),
    }
}

// -----------------------------------------------------------------------
// demo
// -----------------------------------------------------------------------

/// Drive concurrent put/get/wait rounds against an in-process log.
///
/// The log sequences asynchronously on its own cadence, so the three
/// operations genuinely race the sequencer the way they would race a real
/// log server.
async fn run_demo(
    config: &CliConfig,
    records: usize,
    deadline: Option<Duration>,
) -> anyhow::Result<()> {
    let log = Arc::new(MemoryLog::new());

    // Background sequencer, standing in for the log server's batch cadence.
    let sequencer = {
        let log = Arc::clone(&log);
        let cadence = config.sequence_interval();
        tokio::spawn(async move {
            let mut tick = interval(cadence);
            loop {
                tick.tick().await;
                log.advance();
            }
        })
    };

    let poll = config.poll_interval();
    let coordinator = Coordinator::new(
        log,
        EngineConfig {
            poll_interval: poll,
        },
    );

    for n in 0..records {
        let record = LeafRecord::new(format!("[{}] thing {n}", unix_nanos()));
        let extra = Extra::new("extra");
        info!(name = %record.name, "submitting record");

        let put = {
            let coordinator = coordinator.clone();
            let record = record.clone();
            let extra = extra.clone();
            tokio::spawn(async move {
                let started = Instant::now();
                let outcome = coordinator.put(&record, &extra).await?;
                info!(
                    status = outcome.status_str(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "put finished"
                );
                anyhow::Ok(())
            })
        };

        let get = {
            let coordinator = coordinator.clone();
            let record = record.clone();
            tokio::spawn(async move {
                let started = Instant::now();
                loop {
                    match coordinator.get(&record).await? {
                        GetOutcome::Sequenced { leaf_index } => {
                            info!(
                                leaf_index,
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                "get finished"
                            );
                            return anyhow::Ok(());
                        }
                        GetOutcome::Pending => sleep(poll).await,
                    }
                }
            })
        };

        let wait = {
            let coordinator = coordinator.clone();
            let record = record.clone();
            tokio::spawn(async move {
                let started = Instant::now();
                match coordinator.wait(&record, deadline).await? {
                    WaitOutcome::Verified {
                        leaf_index,
                        tree_size,
                    } => {
                        info!(
                            leaf_index,
                            tree_size,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "inclusion verified"
                        );
                    }
                    WaitOutcome::DeadlineExpired { status } => {
                        warn!(status = %status, "deadline expired before inclusion was proven");
                    }
                }
                anyhow::Ok(())
            })
        };

        let (put, get, wait) = tokio::join!(put, get, wait);
        put??;
        get??;
        wait??;
    }

    sequencer.abort();
    Ok(())
}

/// Nanoseconds since the Unix epoch, used to keep demo record names unique.
fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

// -----------------------------------------------------------------------
// verify
// -----------------------------------------------------------------------

/// Check an audit path against a trusted root, entirely offline.
fn run_verify(
    leaf_hash: Option<String>,
    name: Option<String>,
    leaf_index: u64,
    tree_size: u64,
    root: &str,
    path: &[String],
) -> anyhow::Result<()> {
    let leaf_hash = match (leaf_hash, name) {
        (Some(hex_hash), None) => LeafHash::from(decode32(&hex_hash)?),
        (None, Some(name)) => hash_leaf(&LeafRecord::new(name).canonical_bytes()),
        _ => bail!("exactly one of --leaf-hash and --name is required"),
    };

    let root = decode32(root)?;
    let path = path
        .iter()
        .map(|entry| decode32(entry))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outcome = verify_inclusion(&leaf_hash, leaf_index, tree_size, &path, &root)?;
    if !outcome.verified {
        bail!(
            "inclusion proof does not match the trusted root \
             (computed {}, expected {})",
            hex::encode(outcome.computed_root),
            hex::encode(root),
        );
    }

    info!(%leaf_hash, leaf_index, tree_size, "inclusion verified");
    println!("ok");
    Ok(())
}

/// Decode a 32-byte hex string.
fn decode32(s: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(s).with_context(|| format!("invalid hex: {s:?}"))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected 32 bytes, got {}", bytes.len()))
}
