//! Stats command - dashboard statistics

use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Project to report on; omit for the signed-in user's totals
    #[arg(short, long)]
    pub project: Option<String>,

    /// Project API key (defaults to the configured api_key)
    #[arg(long)]
    pub api_key: Option<String>,
}

pub async fn execute(ctx: &CliContext, args: StatsArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let client = ctx.client()?;

    let Some(project) = args.project else {
        let stats = client.user_stats().await?;
        formatter.json(&stats);
        return Ok(Exit::Success);
    };

    let stats = client
        .project_stats(&project, args.api_key.as_deref())
        .await?;

    match ctx.output_format {
        OutputFormat::Json => formatter.json(&stats),
        _ => {
            formatter.section(&format!("Project {}", project));
            let fmt = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".into());
            formatter.kv(
                "Requests",
                &stats
                    .total_requests
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".into()),
            );
            formatter.kv("Average score", &fmt(stats.avg_score));
            formatter.kv("Compliant %", &fmt(stats.compliant_pct));
            formatter.kv("Risk score", &fmt(stats.risk_score));
            for (key, value) in &stats.extra {
                formatter.kv(key, &value.to_string());
            }
        }
    }

    Ok(Exit::Success)
}
