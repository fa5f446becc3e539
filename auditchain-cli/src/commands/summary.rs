//! Summary command - compliance totals for a local history

use crate::input;
use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use auditchain::{summarize, AuditRecord, ChainLink};
use clap::Args;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// JSON file with the records (`-` for stdin)
    #[arg(value_name = "FILE")]
    pub input: String,

    /// Also list every record
    #[arg(short, long)]
    pub list: bool,
}

pub async fn execute(ctx: &CliContext, args: SummaryArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let records = input::read_records(&args.input)?;
    let summary = summarize(&records);

    match ctx.output_format {
        OutputFormat::Json => {
            if args.list {
                formatter.json(&serde_json::json!({ "summary": summary, "records": records }));
            } else {
                formatter.json(&summary);
            }
        }
        _ => {
            formatter.section("Compliance summary");
            formatter.kv("Total", &summary.total.to_string());
            formatter.kv("Compliant", &summary.compliant.to_string());
            formatter.kv("Non-compliant", &summary.non_compliant.to_string());
            formatter.kv("Average score", &format!("{:.3}", summary.avg_score));

            if args.list {
                formatter.section("Records");
                formatter.table_header(&["#", "REQUEST", "SCORE", "COMPLIANT", "COMMITMENT"]);
                for (i, record) in records.iter().enumerate() {
                    let row = record_row(i, record);
                    let cells: Vec<&str> = row.iter().map(String::as_str).collect();
                    formatter.table_row(&cells);
                }
            }
        }
    }

    Ok(Exit::Success)
}

fn record_row(index: usize, record: &AuditRecord) -> [String; 5] {
    [
        index.to_string(),
        record.request_id().unwrap_or("-").to_string(),
        record
            .compliance_score()
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| "-".to_string()),
        if record.is_compliant() { "yes" } else { "no" }.to_string(),
        record
            .commitment()
            .map(short_hash)
            .unwrap_or_else(|| "-".to_string()),
    ]
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(12).collect()
}
