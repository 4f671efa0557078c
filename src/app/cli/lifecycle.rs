use clap::Subcommand;

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::caches::cache_operation;
use crate::app::commands::elastic_data::compact_elastic_data;
use crate::app::commands::federation::federation_operation;
use crate::app::commands::jfr::{JfrScope, JfrStart, start_jfr, stop_jfr};
use crate::app::commands::members::shutdown_member;
use crate::app::commands::reporters::toggle_reporter;
use crate::app::commands::reset;
use crate::app::commands::services::service_operation;
use crate::app::commands::topics::{SubscriberRef, subscriber_operation};
use crate::domain::{AppError, NodeSelection};
use crate::ports::{CacheOperation, FederationOperation, JournalType, ServiceOperation};

#[derive(Subcommand)]
pub enum ShutdownCommands {
    /// Shutdown a member
    Member { node_id: i32 },
    /// Shutdown a service on every member
    Service { name: String },
}

impl ShutdownCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            ShutdownCommands::Member { node_id } => shutdown_member(ctx, node_id, yes)?,
            ShutdownCommands::Service { name } => {
                service_operation(ctx, &name, ServiceOperation::Shutdown, yes)?
            }
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// A service by name
    Service { name: String },
}

impl ServiceCommands {
    fn apply(
        self,
        ctx: &AppContext,
        operation: ServiceOperation,
        yes: bool,
    ) -> Result<(), AppError> {
        let ServiceCommands::Service { name } = self;
        print_result(service_operation(ctx, &name, operation, yes)?)
    }

    pub fn suspend(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        self.apply(ctx, ServiceOperation::Suspend, yes)
    }

    pub fn resume(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        self.apply(ctx, ServiceOperation::Resume, yes)
    }
}

#[derive(Subcommand)]
pub enum StartCommands {
    /// Start a Flight Recording on a member, a role or the whole cluster
    Jfr {
        name: String,
        #[arg(short = 'n', long = "node")]
        node_id: Option<i32>,
        #[arg(short = 'r', long)]
        role: Option<String>,
        /// Recording duration in seconds, 0 records until stopped
        #[arg(short = 'D', long, default_value_t = 0, allow_negative_numbers = true)]
        duration: i64,
        /// Directory on the members to write the recording to
        #[arg(short = 'O', long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Start reporters
    Reporter { nodes: String },
    /// Start federation
    Federation {
        service: String,
        #[arg(short = 'p', long)]
        participant: Option<String>,
    },
}

impl StartCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            StartCommands::Jfr { name, node_id, role, duration, output_dir } => {
                let request = JfrStart {
                    name: &name,
                    scope: JfrScope { node_id, role: role.as_deref() },
                    duration_secs: duration,
                    output_dir: output_dir.as_deref(),
                };
                start_jfr(ctx, &request, yes)?
            }
            StartCommands::Reporter { nodes } => {
                let selection: NodeSelection = nodes.parse()?;
                toggle_reporter(ctx, &selection, true, yes)?
            }
            StartCommands::Federation { service, participant } => federation_operation(
                ctx,
                &service,
                participant.as_deref(),
                FederationOperation::Start,
                yes,
            )?,
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum StopCommands {
    /// Stop a Flight Recording
    Jfr {
        name: String,
        #[arg(short = 'n', long = "node")]
        node_id: Option<i32>,
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Stop reporters
    Reporter { nodes: String },
    /// Stop federation
    Federation {
        service: String,
        #[arg(short = 'p', long)]
        participant: Option<String>,
    },
}

impl StopCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            StopCommands::Jfr { name, node_id, role } => {
                stop_jfr(ctx, &name, &JfrScope { node_id, role: role.as_deref() }, yes)?
            }
            StopCommands::Reporter { nodes } => {
                let selection: NodeSelection = nodes.parse()?;
                toggle_reporter(ctx, &selection, false, yes)?
            }
            StopCommands::Federation { service, participant } => federation_operation(
                ctx,
                &service,
                participant.as_deref(),
                FederationOperation::Stop,
                yes,
            )?,
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum PauseCommands {
    /// Pause federation
    Federation {
        service: String,
        #[arg(short = 'p', long)]
        participant: Option<String>,
    },
}

impl PauseCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let PauseCommands::Federation { service, participant } = self;
        let operation = FederationOperation::Pause;
        print_result(federation_operation(ctx, &service, participant.as_deref(), operation, yes)?)
    }
}

#[derive(Subcommand)]
pub enum ReplicateCommands {
    /// Replicate all data to federation participants
    All {
        service: String,
        #[arg(short = 'p', long)]
        participant: Option<String>,
    },
}

impl ReplicateCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let ReplicateCommands::All { service, participant } = self;
        let operation = FederationOperation::ReplicateAll;
        print_result(federation_operation(ctx, &service, participant.as_deref(), operation, yes)?)
    }
}

#[derive(Subcommand)]
pub enum NotifyCommands {
    /// Tell federation participants that the service has been populated
    Populated {
        service: String,
        #[arg(short = 'p', long)]
        participant: Option<String>,
    },
}

impl NotifyCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let NotifyCommands::Populated { service, participant } = self;
        let operation = FederationOperation::NotifyPopulated;
        print_result(federation_operation(ctx, &service, participant.as_deref(), operation, yes)?)
    }
}

#[derive(Subcommand)]
pub enum SubscriberCommands {
    /// A topic subscriber by id
    Subscriber {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(short = 's', long)]
        service: String,
        #[arg(short = 't', long)]
        topic: String,
    },
}

impl SubscriberCommands {
    pub fn run(self, ctx: &mut AppContext, connect: bool, yes: bool) -> Result<(), AppError> {
        let SubscriberCommands::Subscriber { id, service, topic } = self;
        let target = SubscriberRef { service: &service, topic: &topic, subscriber: id };
        print_result(subscriber_operation(ctx, target, connect, yes)?)
    }
}

#[derive(Subcommand)]
pub enum TruncateCommands {
    /// Remove every entry from a cache without raising events
    Cache {
        name: String,
        #[arg(short = 's', long)]
        service: String,
    },
}

impl TruncateCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let TruncateCommands::Cache { name, service } = self;
        print_result(cache_operation(ctx, &service, &name, CacheOperation::Truncate, yes)?)
    }
}

#[derive(Subcommand)]
pub enum CompactCommands {
    /// Compact elastic data journals
    ElasticData {
        /// Journal type: flash or ram
        #[arg(short = 't', long = "type", default_value = "flash")]
        journal: String,
        #[arg(short = 'n', long = "node", default_value = "all")]
        nodes: String,
    },
}

impl CompactCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let CompactCommands::ElasticData { journal, nodes } = self;
        let journal: JournalType = journal.parse()?;
        let selection: NodeSelection = nodes.parse()?;
        print_result(compact_elastic_data(ctx, journal, &selection, yes)?)
    }
}

#[derive(Subcommand)]
pub enum ResetCommands {
    /// Reset member statistics
    MemberStats {
        #[arg(default_value = "all")]
        nodes: String,
    },
    /// Reset reporter statistics
    ReporterStats {
        #[arg(default_value = "all")]
        nodes: String,
    },
    /// Reset service statistics
    ServiceStats {
        name: String,
        #[arg(short = 'n', long = "node", default_value = "all")]
        nodes: String,
    },
    /// Reset cache statistics
    CacheStats {
        name: String,
        #[arg(short = 's', long)]
        service: String,
        #[arg(short = 'n', long = "node", default_value = "all")]
        nodes: String,
    },
    /// Reset executor statistics
    ExecutorStats { name: String },
}

impl ResetCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            ResetCommands::MemberStats { nodes } => {
                reset::reset_member_stats(ctx, &nodes.parse()?, yes)?
            }
            ResetCommands::ReporterStats { nodes } => {
                reset::reset_reporter_stats(ctx, &nodes.parse()?, yes)?
            }
            ResetCommands::ServiceStats { name, nodes } => {
                reset::reset_service_stats(ctx, &name, &nodes.parse()?, yes)?
            }
            ResetCommands::CacheStats { name, service, nodes } => {
                reset::reset_cache_stats(ctx, &service, &name, &nodes.parse()?, yes)?
            }
            ResetCommands::ExecutorStats { name } => reset::reset_executor_stats(ctx, &name, yes)?,
        };
        print_result(text)
    }
}
