use anyhow::{bail, Context};
use clap::Parser;
use serde_json::{Map, Value};
use std::{path::PathBuf, sync::Arc};
use testbench_client::{
    ApiClient, ExcelFile, FileTokenStore, SettingsLoader, StaticTokenStore, TestCase, TokenStore,
    TracingNotifier, UnitTestReport,
};
use tracing_subscriber::EnvFilter;

/// Submit a unit test run to the test-platform backend.
#[derive(Debug, Parser)]
#[command(name = "testbench", version)]
struct Args {
    /// Project root on the backend host
    #[arg(long)]
    root: String,

    /// Dotted class path, e.g. models.models.Disease
    #[arg(long = "class")]
    class_name: String,

    #[arg(long = "method")]
    method_name: String,

    /// Spreadsheet with the test cases
    #[arg(long)]
    excel: PathBuf,

    /// Sent as-is in the plot_details field
    #[arg(long)]
    plot_details: Option<String>,

    /// JSON object mapping mock targets to values
    #[arg(long)]
    mock_config: Option<String>,

    /// File holding the bearer token; no token is sent when it is missing
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_mock_config(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("mock config is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("mock config must be a JSON object"),
    }
}

fn print_report(report: &UnitTestReport) {
    println!(
        "{} {}.{}",
        if report.success { "PASS" } else { "FAIL" },
        report.class_name.as_deref().unwrap_or("?"),
        report.method_name.as_deref().unwrap_or("?"),
    );
    println!(
        "cases: {} passed, {} failed, {} total",
        report.summary.passed_cases, report.summary.failed_cases, report.summary.total_cases
    );
    if !report.message.is_empty() {
        println!("{}", report.message);
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let mut loader = SettingsLoader::new();
    if let Some(config) = &args.config {
        loader = loader.with_config_path(config);
    }
    let settings = loader.load()?;

    let token_store: Arc<dyn TokenStore + Send + Sync> = match &args.token_file {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(StaticTokenStore::empty()),
    };
    let client = ApiClient::from_settings(settings, token_store, Arc::new(TracingNotifier))?;

    let excel_file = ExcelFile::from_path(&args.excel)
        .await
        .with_context(|| format!("couldn't read {}", args.excel.display()))?;
    let mut test_case = TestCase::new(args.root, args.class_name, args.method_name, excel_file);
    if let Some(raw) = &args.mock_config {
        test_case = test_case.with_mock_config(parse_mock_config(raw)?);
    }
    if let Some(plot_details) = args.plot_details {
        test_case = test_case.with_plot_details(plot_details);
    }

    let report = client.run_unit_test_report(&test_case).await?;
    print_report(&report);

    Ok(report.success)
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(2);
        }
    }
}
