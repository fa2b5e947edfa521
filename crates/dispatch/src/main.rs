use std::time::Duration;

use clap::Parser;

use courier_common::config::AppConfig;
use courier_common::db;
use courier_dispatch::audit::PgAuditLogger;
use courier_dispatch::orchestrator::Dispatcher;
use courier_dispatch::recipients::RecipientSource;
use courier_dispatch::sender::{MessageSender, RetryPolicy};
use courier_gateway::HttpGatewayClient;

const FALLBACK_MESSAGE: &str = "Fallback message";

/// Dispatch a transactional message to every eligible recipient, recording
/// one audit row per attempt.
#[derive(Parser)]
#[command(name = "courier", version)]
struct Cli {
    /// Simulate sending without calling the gateway
    #[arg(long)]
    dry_run: bool,

    /// Delay between recipients, in seconds
    #[arg(long, default_value_t = 1.0)]
    delay: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_dispatch=info,courier_gateway=info,courier_common=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Startup errors (config, database, migrations) are the only non-zero
    // exits; partial delivery failures still exit 0.
    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let source = RecipientSource::new(pool.clone(), config.recipient_min_age);
    let recipients = source.fetch_eligible().await?;
    if recipients.is_empty() {
        tracing::info!("No eligible recipients found");
        return Ok(());
    }

    let body = config
        .default_message
        .clone()
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

    let transport = HttpGatewayClient::new(&config)?;
    let sender = MessageSender::new(transport, RetryPolicy::default(), cli.dry_run);
    let audit = PgAuditLogger::new(pool.clone());
    let pacing = Duration::from_secs_f64(cli.delay.max(0.0));
    let dispatcher = Dispatcher::new(sender, audit, pacing);

    if cli.dry_run {
        tracing::info!("Dry-run mode: no messages will reach the gateway");
    }

    // Ctrl+C aborts the run; committed audit rows stay intact.
    tokio::select! {
        tally = dispatcher.run(&recipients, &body) => {
            tracing::info!(
                success = tally.success,
                failure = tally.failure,
                total = recipients.len(),
                "Done"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping dispatch");
        }
    }

    Ok(())
}
