// Bulk-load random demo wallets into the database.
// Usage: cargo run --bin seed_demo -- --records 10000

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use wallet_ledger_api::clock::SystemClock;
use wallet_ledger_api::config::Config;
use wallet_ledger_api::database;
use wallet_ledger_api::services::DemoDataService;

#[derive(Parser)]
#[command(about = "Fill the wallet database with random demo data")]
struct Args {
    /// Number of wallets to create
    #[arg(long, default_value_t = 10_000)]
    records: usize,

    /// Concurrent workers, each on its own database connection
    #[arg(long, default_value_t = 20)]
    workers: usize,

    /// Abort the batch after this many seconds
    #[arg(long, default_value_t = 1500)]
    deadline_secs: u64,

    /// Wallet name prefix (names are `<prefix>_<n>`)
    #[arg(long, default_value = "wallet")]
    prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_ledger_api=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let pool = database::new_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&*pool).await?;

    let service = DemoDataService::new(pool, Arc::new(SystemClock))
        .with_limits(args.workers, Duration::from_secs(args.deadline_secs));

    let report = service.generate(args.records, &args.prefix).await;

    println!(
        "created {}/{} wallets ({} errors)",
        report.created,
        report.requested,
        report.errors.len()
    );
    for err in &report.errors {
        eprintln!("  {err}");
    }

    if report.created == 0 && !report.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
