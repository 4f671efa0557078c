use clap::Subcommand;

use super::{print_once, print_result, watch_output};
use crate::app::AppContext;
use crate::app::commands::jfr::{JfrScope, get_jfrs};
use crate::app::commands::preferences::{Preference, get_config, get_preference};
use crate::app::commands::{
    caches, contexts, elastic_data, executors, federation, health, http_sessions, members,
    persistence, proxies, reporters, services, topics,
};
use crate::domain::AppError;
use crate::ports::JournalType;

#[derive(Subcommand)]
pub enum GetCommands {
    /// Display cluster members
    Members {
        /// Only show members with this role
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Display services
    Services {
        /// Only show services of this type, e.g. DistributedCache
        #[arg(short = 't', long = "type")]
        service_type: Option<String>,
    },
    /// Display caches
    Caches {
        /// Only show caches of this service
        #[arg(short = 's', long)]
        service: Option<String>,
    },
    /// Display cluster connections
    Clusters,
    /// Display profiles
    Profiles,
    /// Display persistence status per service
    Persistence,
    /// Display snapshots
    Snapshots {
        #[arg(short = 's', long)]
        service: Option<String>,
        /// Show archived snapshots
        #[arg(short = 'a', long)]
        archived: bool,
    },
    /// Display reporters
    Reporters,
    /// Display executors
    Executors,
    /// Display topics
    Topics {
        #[arg(short = 's', long)]
        service: Option<String>,
    },
    /// Display federation details
    Federation {
        #[arg(short = 's', long)]
        service: Option<String>,
    },
    /// Display elastic data journals
    ElasticData {
        /// Journal type: flash or ram
        #[arg(short = 't', long = "type", default_value = "flash")]
        journal: String,
    },
    /// Display HTTP session information
    HttpSessions,
    /// Display health checks
    Health {
        /// Only show the summary line
        #[arg(short = 'S', long)]
        summary: bool,
    },
    /// Display proxy connections
    Proxies {
        /// Only show proxies using this protocol, tcp or http
        #[arg(short = 'p', long)]
        protocol: Option<String>,
    },
    /// Display Flight Recordings
    Jfrs {
        #[arg(short = 'n', long = "node")]
        node_id: Option<i32>,
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Display the config file location and all preferences
    Config,
    /// Display the current context
    Context,
    /// Display the debug preference
    Debug,
    /// Display the color preference
    Color,
    /// Display the request timeout
    Timeout,
    /// Display the ignore-certs preference
    IgnoreCerts,
    /// Display the default bytes format
    BytesFormat,
    /// Display the default heap
    DefaultHeap,
    /// Display the use-gradle preference
    UseGradle,
}

impl GetCommands {
    pub fn run(self, ctx: &mut AppContext) -> Result<(), AppError> {
        let ctx: &AppContext = ctx;
        match self {
            GetCommands::Members { role } => {
                watch_output(ctx, || members::get_members(ctx, role.as_deref()))
            }
            GetCommands::Services { service_type } => {
                watch_output(ctx, || services::get_services(ctx, service_type.as_deref()))
            }
            GetCommands::Caches { service } => {
                watch_output(ctx, || caches::get_caches(ctx, service.as_deref()))
            }
            GetCommands::Clusters => watch_output(ctx, || contexts::get_clusters(ctx)),
            GetCommands::Profiles => watch_output(ctx, || contexts::get_profiles(ctx)),
            GetCommands::Persistence => watch_output(ctx, || persistence::get_persistence(ctx)),
            GetCommands::Snapshots { service, archived } => watch_output(ctx, || {
                persistence::get_snapshots(ctx, service.as_deref(), archived)
            }),
            GetCommands::Reporters => watch_output(ctx, || reporters::get_reporters(ctx)),
            GetCommands::Executors => watch_output(ctx, || executors::get_executors(ctx)),
            GetCommands::Topics { service } => {
                watch_output(ctx, || topics::get_topics(ctx, service.as_deref()))
            }
            GetCommands::Federation { service } => {
                watch_output(ctx, || federation::get_federation(ctx, service.as_deref()))
            }
            GetCommands::ElasticData { journal } => {
                let journal: JournalType = journal.parse()?;
                watch_output(ctx, || elastic_data::get_elastic_data(ctx, journal))
            }
            GetCommands::HttpSessions => {
                watch_output(ctx, || http_sessions::get_http_sessions(ctx))
            }
            GetCommands::Health { summary } => {
                watch_output(ctx, || health::get_health(ctx, summary))
            }
            GetCommands::Proxies { protocol } => {
                watch_output(ctx, || proxies::get_proxies(ctx, protocol.as_deref()))
            }
            GetCommands::Jfrs { node_id, role } => {
                let scope = JfrScope { node_id, role: role.as_deref() };
                print_once(ctx, || get_jfrs(ctx, &scope))
            }
            GetCommands::Config => print_result(get_config(ctx)),
            GetCommands::Context => print_result(contexts::get_context(ctx)),
            GetCommands::Debug => print_result(get_preference(ctx, Preference::Debug)),
            GetCommands::Color => print_result(get_preference(ctx, Preference::Color)),
            GetCommands::Timeout => print_result(get_preference(ctx, Preference::Timeout)),
            GetCommands::IgnoreCerts => print_result(get_preference(ctx, Preference::IgnoreCerts)),
            GetCommands::BytesFormat => print_result(get_preference(ctx, Preference::BytesFormat)),
            GetCommands::DefaultHeap => print_result(get_preference(ctx, Preference::DefaultHeap)),
            GetCommands::UseGradle => print_result(get_preference(ctx, Preference::UseGradle)),
        }
    }
}
