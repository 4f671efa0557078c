use clap::{Args, Subcommand};

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::discovery::{discover_clusters, nslookup};
use crate::domain::{AppError, Endpoint};

fn parse_endpoints(raw: &[String]) -> Result<Vec<Endpoint>, AppError> {
    raw.iter().map(|e| e.parse()).collect()
}

#[derive(Subcommand)]
pub enum DiscoverCommands {
    /// Discover clusters through name service endpoints and add connections for them
    Clusters {
        /// Name service endpoints as host:port, defaulting to localhost:7574
        endpoints: Vec<String>,
        /// Skip endpoints that cannot be contacted
        #[arg(long)]
        ignore: bool,
    },
}

impl DiscoverCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let DiscoverCommands::Clusters { endpoints, ignore } = self;
        let endpoints = parse_endpoints(&endpoints)?;
        print_result(discover_clusters(ctx, &endpoints, ignore, yes)?)
    }
}

#[derive(Args)]
pub struct NslookupArgs {
    /// Name service endpoints as host:port, defaulting to localhost:7574
    endpoints: Vec<String>,
    /// Query to issue, defaulting to Cluster/name
    #[arg(short = 'q', long)]
    query: Option<String>,
    /// Skip endpoints that cannot be contacted
    #[arg(long)]
    ignore: bool,
}

impl NslookupArgs {
    pub fn run(self, ctx: &mut AppContext) -> Result<(), AppError> {
        let endpoints = parse_endpoints(&self.endpoints)?;
        print_result(nslookup(ctx, &endpoints, self.query.as_deref(), self.ignore)?)
    }
}
