use clap::Subcommand;

use super::print_result;
use crate::app::AppContext;
use crate::app::commands::caches::{CacheAttributeChange, cache_operation, set_cache};
use crate::app::commands::preferences::{Preference, clear_preference, set_preference};
use crate::app::commands::{contexts, executors, members, reporters, services};
use crate::domain::{AppError, NodeSelection};
use crate::ports::CacheOperation;

#[derive(Subcommand)]
pub enum SetCommands {
    /// Set a member attribute on one or more members
    Member {
        /// "all" or a comma separated list of node ids
        nodes: String,
        #[arg(short = 'a', long)]
        attribute: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
    },
    /// Set a service attribute
    Service {
        name: String,
        #[arg(short = 'a', long)]
        attribute: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
        /// "all" or a comma separated list of node ids
        #[arg(short = 'n', long = "node", default_value = "all")]
        nodes: String,
    },
    /// Set a cache attribute
    Cache {
        name: String,
        #[arg(short = 's', long)]
        service: String,
        #[arg(short = 'a', long)]
        attribute: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
        #[arg(short = 'n', long = "node", default_value = "all")]
        nodes: String,
    },
    /// Set an executor attribute
    Executor {
        name: String,
        #[arg(short = 'a', long)]
        attribute: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
    },
    /// Set a reporter attribute
    Reporter {
        nodes: String,
        #[arg(short = 'a', long)]
        attribute: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
    },
    /// Set the current context
    Context { name: String },
    /// Add a named profile of JVM arguments
    Profile {
        name: String,
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,
    },
    /// Turn debug logging on or off
    Debug { value: String },
    /// Turn color output on or off
    Color { value: String },
    /// Set the request timeout in seconds
    Timeout { value: String },
    /// Ignore invalid TLS certificates: true or false
    IgnoreCerts { value: String },
    /// Set the default bytes format: b, k, m, g or tb
    BytesFormat { value: String },
    /// Set the default heap
    DefaultHeap { value: String },
    /// Use gradle instead of maven: true or false
    UseGradle { value: String },
}

impl SetCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            SetCommands::Member { nodes, attribute, value } => {
                let selection: NodeSelection = nodes.parse()?;
                members::set_member(ctx, &selection, &attribute, &value, yes)?
            }
            SetCommands::Service { name, attribute, value, nodes } => {
                let selection: NodeSelection = nodes.parse()?;
                services::set_service(ctx, &name, &selection, &attribute, &value, yes)?
            }
            SetCommands::Cache { name, service, attribute, value, nodes } => {
                let selection: NodeSelection = nodes.parse()?;
                let change = CacheAttributeChange {
                    service: &service,
                    cache: &name,
                    selection: &selection,
                    attribute: &attribute,
                    value: &value,
                };
                set_cache(ctx, &change, yes)?
            }
            SetCommands::Executor { name, attribute, value } => {
                executors::set_executor(ctx, &name, &attribute, &value, yes)?
            }
            SetCommands::Reporter { nodes, attribute, value } => {
                let selection: NodeSelection = nodes.parse()?;
                reporters::set_reporter(ctx, &selection, &attribute, &value, yes)?
            }
            SetCommands::Context { name } => contexts::set_context(ctx, &name)?,
            SetCommands::Profile { name, value } => contexts::set_profile(ctx, &name, &value)?,
            SetCommands::Debug { value } => set_preference(ctx, Preference::Debug, &value)?,
            SetCommands::Color { value } => set_preference(ctx, Preference::Color, &value)?,
            SetCommands::Timeout { value } => set_preference(ctx, Preference::Timeout, &value)?,
            SetCommands::IgnoreCerts { value } => {
                set_preference(ctx, Preference::IgnoreCerts, &value)?
            }
            SetCommands::BytesFormat { value } => {
                set_preference(ctx, Preference::BytesFormat, &value)?
            }
            SetCommands::DefaultHeap { value } => {
                set_preference(ctx, Preference::DefaultHeap, &value)?
            }
            SetCommands::UseGradle { value } => set_preference(ctx, Preference::UseGradle, &value)?,
        };
        print_result(text)
    }
}

#[derive(Subcommand)]
pub enum ClearCommands {
    /// Clear the current context
    Context,
    /// Clear the default heap
    DefaultHeap,
    /// Clear the default bytes format
    BytesFormat,
    /// Remove every entry from a cache
    Cache {
        name: String,
        #[arg(short = 's', long)]
        service: String,
    },
}

impl ClearCommands {
    pub fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        let text = match self {
            ClearCommands::Context => contexts::clear_context(ctx)?,
            ClearCommands::DefaultHeap => clear_preference(ctx, Preference::DefaultHeap)?,
            ClearCommands::BytesFormat => clear_preference(ctx, Preference::BytesFormat)?,
            ClearCommands::Cache { name, service } => {
                cache_operation(ctx, &service, &name, CacheOperation::Clear, yes)?
            }
        };
        print_result(text)
    }
}
