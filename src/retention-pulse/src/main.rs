//! Retention Pulse — customer analytics aggregation and scoring engine.
//!
//! CLI entry point standing in for the UI and acquisition collaborators:
//! loads pre-tokenized record files, prints population statistics, and
//! resolves customer lookups into scored profiles.

use std::collections::HashMap;

use clap::Parser;
use tracing::{info, warn};

use pulse_actions::{log_outcome, DispatchRequest, LoggingDispatcher, WorkflowDispatch};
use pulse_core::config::AppConfig;
use pulse_core::{CustomerRecord, DatasetName, PulseError, PulseResult};
use pulse_engine::{AnalyticsEngine, LookupOutcome};

#[derive(Parser, Debug)]
#[command(name = "retention-pulse")]
#[command(about = "Customer analytics aggregation and scoring engine")]
#[command(version)]
struct Cli {
    /// Loyalty record file (overrides config)
    #[arg(long, env = "RETENTION_PULSE__DATASETS__LOYALTY_PATH")]
    loyalty: Option<String>,

    /// Outreach record file (overrides config)
    #[arg(long, env = "RETENTION_PULSE__DATASETS__OUTREACH_PATH")]
    outreach: Option<String>,

    /// Churn record file (overrides config)
    #[arg(long, env = "RETENTION_PULSE__DATASETS__CHURN_PATH")]
    churn: Option<String>,

    /// Customer identifiers to look up
    #[arg(long = "customer")]
    customers: Vec<String>,

    /// Hand recommended actions to the workflow dispatcher
    #[arg(long, default_value_t = false)]
    dispatch: bool,

    /// Skip the population statistics printout
    #[arg(long, default_value_t = false)]
    no_stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retention_pulse=info,pulse_engine=info,pulse_store=info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Retention Pulse starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(path) = cli.loyalty {
        config.datasets.loyalty_path = path;
    }
    if let Some(path) = cli.outreach {
        config.datasets.outreach_path = path;
    }
    if let Some(path) = cli.churn {
        config.datasets.churn_path = path;
    }

    info!(
        loyalty = %config.datasets.loyalty_path,
        outreach = %config.datasets.outreach_path,
        churn = %config.datasets.churn_path,
        centroids = config.scoring.centroids.len(),
        "Configuration loaded"
    );

    let engine = AnalyticsEngine::from_config(&config);

    // Acquisition boundary: a failed load leaves the engine on its
    // last-held state for that dataset (here: empty), never aborts.
    let sources = [
        (DatasetName::Loyalty, config.datasets.loyalty_path.clone()),
        (DatasetName::Outreach, config.datasets.outreach_path.clone()),
        (DatasetName::Churn, config.datasets.churn_path.clone()),
    ];
    for (name, path) in sources {
        match load_records(&path).await {
            Ok(records) => engine.load_dataset(name, records),
            Err(e) => warn!(dataset = %name, path = %path, error = %e, "dataset load failed"),
        }
    }

    if !cli.no_stats {
        for name in DatasetName::ALL {
            let stats = engine.population_stats(name);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    for id in &cli.customers {
        match engine.lookup_customer(id) {
            LookupOutcome::NotFound => {
                warn!(customer_id = %id, "no records found for identifier");
            }
            LookupOutcome::Profile(profile) => {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                if cli.dispatch {
                    for action in profile.recommendation.actions {
                        let request = DispatchRequest::new(action, profile.customer_id.clone());
                        // Fire-and-forget: the outcome is logged, never
                        // awaited or retried.
                        tokio::spawn(async move {
                            let accepted = LoggingDispatcher.dispatch(&request);
                            log_outcome(&request, accepted);
                        });
                    }
                }
            }
        }
    }

    // Let spawned dispatches get their log lines out before exit.
    tokio::task::yield_now().await;

    info!("Retention Pulse done");
    Ok(())
}

/// Read one record file: a JSON array of field-name → text-value rows,
/// i.e. tabular data already tokenized by the upstream producer.
async fn load_records(path: &str) -> PulseResult<Vec<CustomerRecord>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let rows: Vec<HashMap<String, String>> = serde_json::from_str(&raw)
        .map_err(|e| PulseError::DatasetDecode(format!("{path}: {e}")))?;
    Ok(rows.into_iter().map(CustomerRecord::from).collect())
}
