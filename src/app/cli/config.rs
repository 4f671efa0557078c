use clap::Subcommand;

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::contexts::{add_cluster, remove_cluster, remove_profile};
use crate::app::commands::persistence::snapshot_operation;
use crate::domain::AppError;
use crate::domain::config::HTTP_CONNECTION;
use crate::ports::SnapshotOperation;

#[derive(Subcommand)]
pub enum AddCommands {
    /// Add a connection to a cluster's management endpoint
    Cluster {
        name: String,
        /// Management URL, e.g. http://host:30000/management/coherence/cluster
        #[arg(short = 'u', long)]
        url: String,
        /// Connection type
        #[arg(short = 't', long = "type", default_value = HTTP_CONNECTION)]
        kind: String,
    },
}

impl AddCommands {
    pub fn run(self, ctx: &mut AppContext) -> Result<(), AppError> {
        match self {
            AddCommands::Cluster { name, url, kind } => {
                print_result(add_cluster(ctx, &name, &url, &kind)?)
            }
        }
    }
}

#[derive(Subcommand)]
pub enum RemoveCommands {
    /// Remove a cluster connection
    Cluster { name: String },
    /// Remove a profile
    Profile { name: String },
    /// Remove a snapshot
    Snapshot {
        name: String,
        #[arg(short = 's', long)]
        service: String,
        /// Remove an archived snapshot
        #[arg(short = 'a', long)]
        archived: bool,
    },
}

impl RemoveCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            RemoveCommands::Cluster { name } => remove_cluster(ctx, &name, yes)?,
            RemoveCommands::Profile { name } => remove_profile(ctx, &name, yes)?,
            RemoveCommands::Snapshot { name, service, archived } => {
                let operation = if archived {
                    SnapshotOperation::RemoveArchived
                } else {
                    SnapshotOperation::Remove
                };
                snapshot_operation(ctx, &service, &name, operation, yes)?
            }
        };
        print_result(text)
    }
}
