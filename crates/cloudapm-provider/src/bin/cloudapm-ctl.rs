// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! cloudapm-ctl - drive the APM provider from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use cloudapm_provider::{
    ApmAgentDataSource, ApmInstanceResource, DATA_SOURCE_APM_AGENT, Provider, RESOURCE_APM,
    ResourceData, RetryPolicy,
};
use cloudapm_sdk::CloudConfig;

#[derive(Parser)]
#[command(name = "cloudapm-ctl")]
#[command(about = "Create and inspect cloud APM instances")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an APM instance
    Create {
        /// Instance name
        #[arg(long)]
        name: String,
        /// Instance description
        #[arg(long)]
        description: Option<String>,
        /// Trace retention in days
        #[arg(long)]
        trace_duration: Option<i64>,
        /// Daily span quota
        #[arg(long)]
        span_daily_counters: Option<i64>,
    },
    /// Show an APM instance
    Read {
        /// Instance id
        instance_id: String,
    },
    /// Show the agent endpoints of an APM instance
    Agent {
        /// Instance id
        instance_id: String,
    },
    /// Print the resource and data source schemas
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cloudapm=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Schema = cli.command {
        return print_json(&json!({
            "resources": { RESOURCE_APM: ApmInstanceResource::schema_definition() },
            "data_sources": { DATA_SOURCE_APM_AGENT: ApmAgentDataSource::schema_definition() },
        }));
    }

    let config = CloudConfig::from_env().inspect_err(|e| error!("Configuration error: {}", e))?;
    info!(region = %config.region, endpoint = %config.endpoint, "Configuration loaded");
    let provider = Provider::from_config(&config, RetryPolicy::default())?;

    match cli.command {
        Commands::Create {
            name,
            description,
            trace_duration,
            span_daily_counters,
        } => {
            let mut data = ResourceData::new().with("name", name);
            if let Some(description) = description {
                data.set("description", description);
            }
            if let Some(days) = trace_duration {
                data.set("trace_duration", days);
            }
            if let Some(counters) = span_daily_counters {
                data.set("span_daily_counters", counters);
            }
            provider.create(RESOURCE_APM, &mut data).await?;
            print_json(&data)
        }
        Commands::Read { instance_id } => {
            let mut data = ResourceData::new().with_id(instance_id.as_str());
            provider.read(RESOURCE_APM, &mut data).await?;
            if data.id().is_none() {
                anyhow::bail!("APM instance {} not found", instance_id);
            }
            print_json(&data)
        }
        Commands::Agent { instance_id } => {
            let mut data = ResourceData::new().with("instance_id", instance_id);
            provider
                .read_data_source(DATA_SOURCE_APM_AGENT, &mut data)
                .await?;
            print_json(&data)
        }
        Commands::Schema => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
