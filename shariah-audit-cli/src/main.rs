//! # shariah-audit-cli
//!
//! Command-line front end for the Zakat engine and the Shariah audit backend.
//!
//! ## Usage
//! ```bash
//! # Zakat for the sample business, with placeholder advice
//! shariah-audit-cli zakat --advice static
//!
//! # Zakat for a saved request, as JSON
//! shariah-audit-cli zakat --input request.json --json
//!
//! # Audit a contract, serving sample data if the backend is down
//! shariah-audit-cli --allow-fallback audit --file contract.txt --search
//!
//! # Look up standards
//! shariah-audit-cli standards --product-type Murabaha
//! shariah-audit-cli standards --query "late payment penalty"
//! ```

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use shariah_audit::advisory::AdvisoryMode;
use shariah_audit::balance_sheet::{CalculationRequest, FinancialData};
use shariah_audit::client::ApiClient;
use shariah_audit::{BalanceSheet, EntityInfo, ZakatCalculator, ZakatError};

mod config_loader;
mod render;

use config_loader::{CliConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "shariah-audit-cli")]
#[command(author = "shariah-audit contributors")]
#[command(version)]
#[command(about = "Zakat calculation and Shariah compliance audits", long_about = None)]
struct Args {
    /// Enable debug logging, also written to the logs/ directory
    #[arg(long, global = true, default_value = "false")]
    log: bool,

    /// Audit backend base URL (default http://localhost:5000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Serve sample data when the backend fails instead of reporting an error
    #[arg(long, global = true, default_value = "false")]
    allow_fallback: bool,

    /// Deadline for each backend request, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate Zakat from a balance sheet
    Zakat {
        /// JSON file with a calculation request or entry-form data; the sample business when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Where advisory text comes from
        #[arg(long, value_enum, default_value_t = AdviceSource::None)]
        advice: AdviceSource,

        /// Print the result as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Submit a contract text for a compliance audit
    Audit {
        /// File containing the contract text
        #[arg(long)]
        file: PathBuf,

        /// Let the backend search the standards library
        #[arg(long, default_value = "false")]
        search: bool,

        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Look up Shariah standards
    #[command(group(ArgGroup::new("lookup").required(true).args(["query", "product_type"])))]
    Standards {
        /// Free-text search, e.g. a contract clause
        #[arg(long)]
        query: Option<String>,

        /// Standards applicable to a product type, e.g. Murabaha
        #[arg(long)]
        product_type: Option<String>,
    },
    /// Check whether the backend is reachable
    Health {
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Write a starter config file
    InitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AdviceSource {
    None,
    Static,
    Remote,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let file_config = CliConfig::load();

    let _file_guard = init_tracing(args.log || file_config.logging_enabled())?;

    let overrides = Overrides {
        api_url: args.api_url.clone(),
        allow_fallback: args.allow_fallback,
        timeout_ms: args.timeout_ms,
    };

    match args.command {
        Commands::Zakat { input, advice, json } => {
            run_zakat(&file_config, &overrides, input.as_deref(), advice, json).await
        }
        Commands::Audit { file, search, json } => {
            let client = ApiClient::new(file_config.client_config(&overrides)?)?;
            let text = std::fs::read_to_string(&file)?;
            let report = client.audit_product(&text, search).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::audit_report(&report));
            }
            Ok(())
        }
        Commands::Standards { query, product_type } => {
            let client = ApiClient::new(file_config.client_config(&overrides)?)?;
            let standards = match (query, product_type) {
                (Some(query), _) => client.search_standards(&query).await?,
                (None, Some(product_type)) => client.fetch_applicable_standards(&product_type).await?,
                (None, None) => Vec::new(),
            };
            println!("{}", render::standards_list(&standards));
            Ok(())
        }
        Commands::Health { json } => {
            let client = ApiClient::new(file_config.client_config(&overrides)?)?;
            let health = client.check_server_health().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("{}", render::health_line(&health));
            }
            Ok(())
        }
        Commands::InitConfig => {
            let path = CliConfig::create_sample()?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Console logging to stderr; with `verbose`, debug level plus a daily file under logs/.
fn init_tracing(
    verbose: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    if !verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("shariah_audit=info".parse()?),
            )
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::daily("logs", "shariah-audit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("shariah_audit=debug".parse()?)
        .add_directive("shariah_audit_cli=debug".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    tracing::info!("--- Shariah audit session started [{}] ---", chrono::Utc::now());
    Ok(Some(guard))
}

async fn run_zakat(
    file_config: &CliConfig,
    overrides: &Overrides,
    input: Option<&Path>,
    advice: AdviceSource,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (sheet, entity) = match input {
        Some(path) => read_input(path)?,
        None => FinancialData::sample().into_parts(),
    };

    for label in sheet.unknown_labels() {
        tracing::warn!(label, "Unrecognised balance-sheet label ignored");
    }

    let calculator = ZakatCalculator::new(file_config.zakat_config()?)?;
    let result = match advice {
        AdviceSource::None => calculator.calculate(&sheet, &entity),
        AdviceSource::Static => {
            calculator
                .calculate_with_mode(&sheet, &entity, AdvisoryMode::Static, None)
                .await
        }
        AdviceSource::Remote => {
            let client = ApiClient::new(file_config.client_config(overrides)?)?;
            calculator
                .calculate_with_mode(&sheet, &entity, AdvisoryMode::Remote, Some(&client))
                .await
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::zakat_report(&result));
    }
    Ok(())
}

/// Accepts either a full calculation request or entry-form data.
fn read_input(path: &Path) -> Result<(BalanceSheet, EntityInfo), ZakatError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ZakatError::invalid_input("input", format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_input(&content)
}

/// A document with a `financial_data` key is a calculation request; anything else is form data.
fn parse_input(content: &str) -> Result<(BalanceSheet, EntityInfo), ZakatError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.get("financial_data").is_some() {
        let request: CalculationRequest = serde_json::from_value(value)?;
        return Ok((request.financial_data.balance_sheet, request.entity_info));
    }
    let form: FinancialData = serde_json::from_value(value)?;
    Ok(form.into_parts())
}
