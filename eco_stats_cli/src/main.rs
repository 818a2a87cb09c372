mod output;

use anyhow::{Context, Result};
use clap::Parser;
use eco_stats_lib::{EcoStats, EcoStatsConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "eco-stats")]
#[command(about = "Report which economic data services (BEA, BLS, Census, FRED) are configured")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eco_stats=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let config = EcoStatsConfig::from_env().context("failed to load configuration")?;
    let stats = EcoStats::new(&config).context("failed to initialize clients")?;

    let rows = output::build_service_rows(&stats, &config);
    match format {
        OutputFormat::Table => output::print_services_table(&rows),
        OutputFormat::Json => output::print_json(&rows),
    }

    let released = stats.close();
    tracing::debug!("Released {} client(s)", released);

    Ok(())
}
