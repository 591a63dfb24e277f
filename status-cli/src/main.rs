use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use swarm_gateway::{DockerGateway, GatewayArgs, StatusClient};
use swarm_status::StatusAggregate;
use tokio::time::{sleep, Instant};

/// Exit code when a diagnostic finding is reported.
const EXIT_FINDING: u8 = 1;
/// Exit code when the control plane could not be queried.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "status-cli")]
#[command(about = "Checks swarm service and deployment status for deployment pipelines")]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that an image was rolled out to a service
    Deployment {
        /// Service name
        #[arg(short, long)]
        service: String,
        /// Image reference, without digest
        #[arg(short, long)]
        image: String,
        /// Keep polling for up to this many seconds while a finding is reported
        #[arg(long, default_value_t = 0)]
        wait: u64,
        /// Seconds between two polls
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
    /// Report the replica counts of a service
    Service {
        /// Service name
        #[arg(short, long)]
        service: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(status) => {
            match serde_json::to_string_pretty(&status) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("ERROR: failed to encode status: {}", e),
            }
            exit_code(&status)
        }
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<StatusAggregate> {
    let gateway = DockerGateway::connect(&cli.gateway.to_config())
        .context("Failed to configure the Docker gateway")?;
    let client = StatusClient::new(Arc::new(gateway));

    match cli.command {
        Commands::Deployment {
            service,
            image,
            wait,
            interval,
        } => {
            poll_deployment(
                &client,
                &service,
                &image,
                Duration::from_secs(wait),
                Duration::from_secs(interval),
            )
            .await
        }
        Commands::Service { service } => client
            .service_status(&service)
            .await
            .with_context(|| format!("Failed to query the status of {}", service)),
    }
}

/// Re-queries until no finding remains or `wait` has elapsed.
async fn poll_deployment(
    client: &StatusClient,
    service: &str,
    image: &str,
    wait: Duration,
    interval: Duration,
) -> Result<StatusAggregate> {
    let deadline = Instant::now() + wait;
    loop {
        let status = client
            .deployment_status(service, image)
            .await
            .with_context(|| format!("Failed to query the deployment of {} on {}", image, service))?;

        let finding = match &status.error {
            None => return Ok(status),
            Some(finding) => finding,
        };
        if Instant::now() + interval > deadline {
            return Ok(status);
        }

        info!("{}", finding);
        debug!("Polling {} again in {:?}", service, interval);
        sleep(interval).await;
    }
}

fn exit_code(status: &StatusAggregate) -> ExitCode {
    match &status.error {
        None => ExitCode::SUCCESS,
        Some(finding) => {
            eprintln!("{}", finding);
            ExitCode::from(EXIT_FINDING)
        }
    }
}
