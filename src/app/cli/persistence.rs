use std::path::PathBuf;

use clap::Subcommand;

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::persistence::{force_recovery, snapshot_operation};
use crate::app::commands::thread_dumps::{ThreadDumpRequest, retrieve_thread_dumps};
use crate::domain::{AppError, NodeSelection};
use crate::ports::SnapshotOperation;

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// A snapshot of a persistent service
    Snapshot {
        name: String,
        #[arg(short = 's', long)]
        service: String,
    },
}

impl SnapshotCommands {
    fn apply(
        self,
        ctx: &AppContext,
        operation: SnapshotOperation,
        yes: bool,
    ) -> Result<(), AppError> {
        let SnapshotCommands::Snapshot { name, service } = self;
        print_result(snapshot_operation(ctx, &service, &name, operation, yes)?)
    }

    pub fn create(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        self.apply(ctx, SnapshotOperation::Create, yes)
    }

    pub fn recover(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        self.apply(ctx, SnapshotOperation::Recover, yes)
    }

    pub fn archive(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        self.apply(ctx, SnapshotOperation::Archive, yes)
    }
}

#[derive(Subcommand)]
pub enum RetrieveCommands {
    /// Retrieve an archived snapshot
    Snapshot {
        name: String,
        #[arg(short = 's', long)]
        service: String,
    },
    /// Capture thread dumps from members into local files
    ThreadDumps {
        /// "all" or a comma separated list of node ids
        nodes: String,
        /// Number of dumps to take per member
        #[arg(short = 'N', long = "number", default_value_t = 5)]
        iterations: u32,
        /// Seconds between dumps
        #[arg(short = 'D', long = "dump-delay", default_value_t = 10)]
        dump_delay: u64,
        /// Directory to write the dump files to
        #[arg(short = 'O', long = "output-dir", default_value = ".")]
        output_dir: PathBuf,
    },
}

impl RetrieveCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            RetrieveCommands::Snapshot { name, service } => {
                snapshot_operation(ctx, &service, &name, SnapshotOperation::Retrieve, yes)?
            }
            RetrieveCommands::ThreadDumps { nodes, iterations, dump_delay, output_dir } => {
                let selection: NodeSelection = nodes.parse()?;
                let request = ThreadDumpRequest {
                    selection: &selection,
                    output_dir: &output_dir,
                    iterations,
                    delay_secs: dump_delay,
                };
                retrieve_thread_dumps(ctx, &request, yes)?
            }
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum ForceCommands {
    /// Force recovery of a persistent service
    Recovery {
        #[arg(short = 's', long)]
        service: String,
    },
}

impl ForceCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let ForceCommands::Recovery { service } = self;
        print_result(force_recovery(ctx, &service, yes)?)
    }
}
