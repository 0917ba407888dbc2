use chainscope::insight::{self, InsightConfig};
use chainscope::{Dashboard, Role};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chainscope", version, about = "Supply chain KPI summary with optional AI insight")]
struct Cli {
    /// Inbound logistics CSV (Late, Vendor Name, Units, Transit_Mode, Reason_Code)
    #[arg(long = "inbound")]
    inbound: Option<PathBuf>,

    /// Outbound fulfillment CSV (Units_Ordered, Units_Invoiced, Channel, Avg_Price, Margin_Pct)
    #[arg(long = "outbound")]
    outbound: Option<PathBuf>,

    /// Inventory catalog CSV (Product Group, Division)
    #[arg(long = "inventory")]
    inventory: Option<PathBuf>,

    /// Report output format: text | json
    #[arg(long = "format", default_value = "text")]
    format: String,

    /// Question to ask about the report
    #[arg(long = "ask")]
    ask: Option<String>,

    #[arg(long = "api-key", env = "ANTHROPIC_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    #[arg(long = "model", default_value = insight::DEFAULT_MODEL)] model: String,
    #[arg(long = "endpoint", default_value = insight::DEFAULT_ENDPOINT)] endpoint: String,
    #[arg(long = "max-tokens", default_value_t = insight::DEFAULT_MAX_TOKENS)] max_tokens: u32,
    #[arg(long = "api-version", default_value = insight::DEFAULT_API_VERSION)] api_version: String,
    /// Company name used to frame the question
    #[arg(long = "organization")] organization: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chainscope=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = InsightConfig {
        endpoint: cli.endpoint.clone(),
        model: cli.model.clone(),
        max_tokens: cli.max_tokens,
        api_version: cli.api_version.clone(),
        organization: cli.organization.clone(),
    };
    let mut dashboard = Dashboard::new(config);

    let inputs = [
        (Role::Inbound, &cli.inbound),
        (Role::Outbound, &cli.outbound),
        (Role::Inventory, &cli.inventory),
    ];
    for (role, path) in inputs {
        if let Some(p) = path {
            let rows = dashboard.load_csv_file(role, p)?;
            eprintln!("✓ {role}: {rows} rows loaded");
        }
    }

    match dashboard.summary() {
        Some(summary) => {
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else if let Some(report) = dashboard.report() {
                print!("{report}");
            }
        }
        None => eprintln!("{}", insight::MISSING_DATA),
    }

    if let Some(question) = cli.ask.as_deref() {
        match dashboard.ask(&cli.api_key, question).await {
            Ok(answer) => {
                println!();
                println!("{answer}");
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
