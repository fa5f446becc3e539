//! Login command - obtain a JWT session

use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use auditchain::config::ENV_ACCESS_TOKEN;
use clap::Args;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long, required_unless_present = "check")]
    pub username: Option<String>,

    #[arg(long, env = "AUDITCHAIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Only check whether the configured access token is still accepted
    #[arg(long)]
    pub check: bool,
}

pub async fn execute(ctx: &CliContext, args: LoginArgs) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let client = ctx.client()?;

    if args.check {
        if client.verify_session().await? {
            formatter.success("Access token is valid");
            return Ok(Exit::Success);
        }
        anyhow::bail!("access token was rejected; run `auditchain login` again");
    }

    let username = args.username.unwrap_or_default();
    let Some(password) = args.password else {
        anyhow::bail!("password required (--password or AUDITCHAIN_PASSWORD)");
    };
    let session = client.login(&username, &password).await?;

    match ctx.output_format {
        OutputFormat::Json => formatter.json(&session),
        _ => {
            formatter.success(&format!("Signed in as {}", username));
            formatter.kv("Access token", &session.access_token);
            if let Some(refresh) = &session.refresh_token {
                formatter.kv("Refresh token", refresh);
            }
            ctx.status(&format!(
                "Export {}=<access token> to use it in later commands",
                ENV_ACCESS_TOKEN
            ));
        }
    }

    Ok(Exit::Success)
}
