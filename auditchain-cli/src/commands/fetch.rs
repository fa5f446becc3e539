//! Fetch command - download a project's history and verify it locally

use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use auditchain::{verifier, ApiError, ChainStatus};
use clap::Args;
use futures::future;
use tracing::debug;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Project whose compliance history is fetched
    #[arg(short, long)]
    pub project: String,

    /// Project API key (defaults to the configured api_key)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Also ask the server for its own verdict
    #[arg(long)]
    pub remote: bool,

    /// Write the fetched records to this file as JSON
    #[arg(long, value_name = "FILE")]
    pub save: Option<std::path::PathBuf>,
}

pub async fn execute(ctx: &CliContext, args: FetchArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let client = ctx.client()?;
    let api_key = args.api_key.as_deref();

    ctx.status(&format!("Fetching compliance history for {}", args.project));

    let local = client.list_all_entries(&args.project, api_key);
    let (records, remote) = if args.remote {
        let remote = client.verify_chain_remote(&args.project, api_key);
        let (records, remote) = future::join(local, remote).await;
        (records, Some(remote))
    } else {
        (local.await, None)
    };

    let records = match records {
        Ok(records) => Some(records),
        // Bad input or credentials are the caller's problem, not the server's.
        Err(e @ (ApiError::MissingCredential(_) | ApiError::InvalidArgument(_))) => {
            return Err(e.into())
        }
        Err(e) => {
            formatter.warning(&format!("could not fetch history: {}", e));
            None
        }
    };

    if let (Some(records), Some(path)) = (&records, &args.save) {
        std::fs::write(path, serde_json::to_string_pretty(records)?)?;
        ctx.status(&format!("Saved {} records to {}", records.len(), path.display()));
    }

    let report = records.as_deref().map(verifier::report);
    let status = ChainStatus::from_report(report.as_ref());

    let remote_valid = match remote {
        Some(Ok(verdict)) => {
            debug!("remote verdict: {}", verdict.raw);
            verdict.valid
        }
        Some(Err(e)) => {
            formatter.warning(&format!("remote verification failed: {}", e));
            None
        }
        None => None,
    };
    if let Some(remote_valid) = remote_valid {
        if report.is_some() && remote_valid != status.is_verified() {
            formatter.warning(&format!(
                "server reports chain {} but local check says {}",
                if remote_valid { "valid" } else { "invalid" },
                status.label()
            ));
        }
    }

    match ctx.output_format {
        OutputFormat::Json => formatter.json(&serde_json::json!({
            "project": args.project,
            "status": status,
            "report": report,
            "remote_valid": remote_valid,
        })),
        _ => {
            formatter.kv("Project", &args.project);
            if let Some(report) = &report {
                formatter.kv("Entries", &report.total_entries.to_string());
            }
            if args.remote {
                formatter.kv(
                    "Server verdict",
                    match remote_valid {
                        Some(true) => "valid",
                        Some(false) => "invalid",
                        None => "unknown",
                    },
                );
            }
            formatter.chain_status(&status);
        }
    }

    Ok(status.into())
}
