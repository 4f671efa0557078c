use clap::Subcommand;

use super::{print_once, watch_output};
use crate::app::AppContext;
use crate::app::commands::jfr::{JfrScope, describe_jfr};
use crate::app::commands::members::{ExtendedInfo, describe_member};
use crate::app::commands::{caches, cluster, executors, reporters, services};
use crate::domain::AppError;

#[derive(Subcommand)]
pub enum DescribeCommands {
    /// Describe a cluster connection and the cluster behind it
    Cluster { name: String },
    /// Describe a member
    Member {
        node_id: i32,
        /// Extended platform MBeans to include: none, all or a comma separated list
        #[arg(short = 'X', long, default_value = "none")]
        extended: String,
    },
    /// Describe a service
    Service { name: String },
    /// Describe a cache
    Cache {
        name: String,
        #[arg(short = 's', long)]
        service: String,
    },
    /// Describe an executor
    Executor { name: String },
    /// Describe the reporter on a member
    Reporter { node_id: i32 },
    /// Describe a Flight Recording
    Jfr {
        name: String,
        #[arg(short = 'n', long = "node")]
        node_id: Option<i32>,
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
}

impl DescribeCommands {
    pub fn run(self, ctx: &mut AppContext) -> Result<(), AppError> {
        let ctx: &AppContext = ctx;
        match self {
            DescribeCommands::Cluster { name } => {
                watch_output(ctx, || cluster::describe_cluster(ctx, &name))
            }
            DescribeCommands::Member { node_id, extended } => {
                let extended: ExtendedInfo = extended.parse()?;
                watch_output(ctx, || describe_member(ctx, node_id, &extended))
            }
            DescribeCommands::Service { name } => {
                watch_output(ctx, || services::describe_service(ctx, &name))
            }
            DescribeCommands::Cache { name, service } => {
                watch_output(ctx, || caches::describe_cache(ctx, &service, &name))
            }
            DescribeCommands::Executor { name } => {
                watch_output(ctx, || executors::describe_executor(ctx, &name))
            }
            DescribeCommands::Reporter { node_id } => {
                watch_output(ctx, || reporters::describe_reporter(ctx, node_id))
            }
            DescribeCommands::Jfr { name, node_id, role } => {
                let scope = JfrScope { node_id, role: role.as_deref() };
                print_once(ctx, || describe_jfr(ctx, &name, &scope))
            }
        }
    }
}
