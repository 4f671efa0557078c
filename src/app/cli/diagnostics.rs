use clap::Subcommand;

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::diagnostics::{configure_tracing, dump_cluster_heap, log_cluster_state};
use crate::app::commands::jfr::{JfrScope, dump_jfr};
use crate::domain::AppError;

#[derive(Subcommand)]
pub enum DumpCommands {
    /// Dump a running Flight Recording to a file on the members
    Jfr {
        name: String,
        #[arg(short = 'n', long = "node")]
        node_id: Option<i32>,
        #[arg(short = 'r', long)]
        role: Option<String>,
        /// File name for the dump
        #[arg(short = 'f', long)]
        filename: Option<String>,
    },
    /// Dump the heap of every member, or every member with a role
    ClusterHeap {
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
}

impl DumpCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            DumpCommands::Jfr { name, node_id, role, filename } => {
                let scope = JfrScope { node_id, role: role.as_deref() };
                dump_jfr(ctx, &name, &scope, filename.as_deref(), yes)?
            }
            DumpCommands::ClusterHeap { role } => dump_cluster_heap(ctx, role.as_deref(), yes)?,
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Log the cluster state on every member, or every member with a role
    ClusterState {
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
}

impl LogCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let LogCommands::ClusterState { role } = self;
        print_result(log_cluster_state(ctx, role.as_deref(), yes)?)
    }
}

#[derive(Subcommand)]
pub enum ConfigureCommands {
    /// Set the tracing sampling ratio
    Tracing {
        #[arg(short = 'r', long)]
        role: Option<String>,
        /// Sampling ratio between 0 and 1, or -1 to disable tracing
        #[arg(short = 't', long = "tracing-ratio", allow_negative_numbers = true)]
        ratio: f64,
    },
}

impl ConfigureCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let ConfigureCommands::Tracing { role, ratio } = self;
        print_result(configure_tracing(ctx, role.as_deref(), ratio, yes)?)
    }
}
