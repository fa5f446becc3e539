//! Verify command - check a local hash chain

use crate::input;
use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use auditchain::{verifier, ChainStatus};
use clap::Args;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// JSON file with the records in server order (`-` for stdin)
    #[arg(value_name = "FILE")]
    pub input: String,
}

pub async fn execute(ctx: &CliContext, args: VerifyArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let records = input::read_records(&args.input)?;
    ctx.status(&format!("Verifying {} records from {}", records.len(), args.input));

    let report = verifier::report(&records);
    let status = ChainStatus::from_report(Some(&report));

    match ctx.output_format {
        OutputFormat::Json => {
            formatter.json(&serde_json::json!({ "status": status, "report": report }));
        }
        _ => {
            formatter.kv("Entries", &report.total_entries.to_string());
            formatter.kv("Checked at", &report.checked_at.to_rfc3339());
            formatter.chain_status(&status);
        }
    }

    Ok(status.into())
}
