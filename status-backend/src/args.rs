use clap::Parser;
use swarm_gateway::GatewayArgs;

#[derive(Parser, Debug, Clone)]
#[command(name = "status-backend")]
#[command(about = "HTTP API reporting swarm service and deployment status", long_about = None)]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "STATUS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}
