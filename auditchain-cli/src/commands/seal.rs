//! Seal command - build a hash chain from unsealed payloads

use crate::input;
use crate::{CliContext, Exit, OutputFormatter};
use auditchain::ChainSealer;
use clap::Args;

#[derive(Debug, Args)]
pub struct SealArgs {
    /// JSON array of payload objects (`-` for stdin)
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Commitment of the record this chain continues from
    #[arg(long, value_name = "HASH")]
    pub resume: Option<String>,
}

/// Existing `hash_lock`/`previous_hash` fields are discarded and recomputed.
/// The sealed chain is always written as JSON.
pub async fn execute(ctx: &CliContext, args: SealArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let records = input::read_records(&args.input)?;

    let mut sealer = match args.resume {
        Some(hash) => ChainSealer::resume(hash),
        None => ChainSealer::new(),
    };
    let sealed = sealer.seal_all(records.into_iter().map(|r| r.payload));

    formatter.json(&sealed);
    ctx.status(&format!(
        "Sealed {} records; tail commitment {}",
        sealed.len(),
        sealer.last_commitment().unwrap_or("(none)")
    ));
    Ok(Exit::Success)
}
