//! CLI Adapter.

mod config;
mod describe;
mod diagnostics;
mod discovery;
mod get;
mod lifecycle;
mod persistence;
mod set;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::{Args, Parser, Subcommand};

use crate::adapters::logging::init_logging;
use crate::adapters::{
    ConfigStore, HttpFetcherFactory, HttpSettings, LATEST_RELEASE_URL, PasswordSource,
    TcpNameServiceClient, default_config_dir, fetch_latest_version,
};
use crate::app::commands::version::show_version;
use crate::app::watch::{WatchOptions, interrupt_flag, run_watch};
use crate::app::{AppContext, GlobalOptions};
use crate::domain::{AppError, BytesUnit};

const NAME_SERVICE_RETRIES: u32 = 2;

#[derive(Parser)]
#[command(name = "cohctl")]
#[command(version)]
#[command(
    about = "Inspect, tune and operate Coherence clusters over their management endpoint",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct GlobalArgs {
    /// Config file to use instead of <config-dir>/cohctl.yaml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Config directory (defaults to $HOME/.cohctl)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,
    /// Output format: table, wide, json or jsonpath=<expr>
    #[arg(short = 'o', long, global = true, default_value = "table")]
    output: String,
    /// Repeat the command every --delay seconds
    #[arg(short = 'w', long, global = true)]
    watch: bool,
    /// Repeat the command, clearing the screen between frames
    #[arg(short = 'W', long, global = true)]
    watch_clear: bool,
    /// Seconds between watch frames
    #[arg(short = 'd', long, global = true, default_value_t = 5)]
    delay: i32,
    /// Read the password from the first line of standard input
    #[arg(short = 'i', long, global = true)]
    stdin: bool,
    /// Basic authentication username
    #[arg(short = 'U', long, global = true)]
    username: Option<String>,
    /// Connection to use instead of the current context
    #[arg(short = 'c', long, global = true)]
    connection: Option<String>,
    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,
    /// Show sizes in bytes
    #[arg(short = 'b', long, global = true)]
    bytes: bool,
    /// Show sizes in KB
    #[arg(short = 'k', long, global = true)]
    kb: bool,
    /// Show sizes in MB
    #[arg(short = 'm', long, global = true)]
    mb: bool,
    /// Show sizes in GB
    #[arg(short = 'g', long, global = true)]
    gb: bool,
    /// Show sizes in TB
    #[arg(long, global = true)]
    tb: bool,
}

impl GlobalArgs {
    /// At most one unit flag may be given.
    fn bytes_unit(&self) -> Result<Option<BytesUnit>, AppError> {
        let flags = [
            (self.bytes, BytesUnit::Bytes),
            (self.kb, BytesUnit::Kilo),
            (self.mb, BytesUnit::Mega),
            (self.gb, BytesUnit::Giga),
            (self.tb, BytesUnit::Tera),
        ];
        let mut selected = flags.into_iter().filter(|(set, _)| *set).map(|(_, unit)| unit);
        let unit = selected.next();
        if selected.next().is_some() {
            return Err(AppError::invalid("only one of -b, -k, -m, -g or --tb may be specified"));
        }
        Ok(unit)
    }

    fn options(&self) -> Result<GlobalOptions, AppError> {
        Ok(GlobalOptions {
            output: self.output.parse()?,
            watch: WatchOptions::new(self.watch, self.watch_clear, self.delay)?,
            connection: self.connection.clone(),
            bytes_unit: self.bytes_unit()?,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display one or many resources
    Get {
        #[command(subcommand)]
        resource: get::GetCommands,
    },
    /// Show details of a specific resource
    Describe {
        #[command(subcommand)]
        resource: describe::DescribeCommands,
    },
    /// Change an attribute, preference, context or profile
    Set {
        #[command(subcommand)]
        resource: set::SetCommands,
    },
    /// Clear a preference, the current context or a cache
    Clear {
        #[command(subcommand)]
        resource: set::ClearCommands,
    },
    /// Add a cluster connection
    Add {
        #[command(subcommand)]
        resource: config::AddCommands,
    },
    /// Remove a cluster connection, profile or snapshot
    Remove {
        #[command(subcommand)]
        resource: config::RemoveCommands,
    },
    /// Shutdown a member or service
    Shutdown {
        #[command(subcommand)]
        resource: lifecycle::ShutdownCommands,
    },
    /// Suspend a service
    Suspend {
        #[command(subcommand)]
        resource: lifecycle::ServiceCommands,
    },
    /// Resume a suspended service
    Resume {
        #[command(subcommand)]
        resource: lifecycle::ServiceCommands,
    },
    /// Start a Flight Recording, reporter or federation
    Start {
        #[command(subcommand)]
        resource: lifecycle::StartCommands,
    },
    /// Stop a Flight Recording, reporter or federation
    Stop {
        #[command(subcommand)]
        resource: lifecycle::StopCommands,
    },
    /// Pause federation
    Pause {
        #[command(subcommand)]
        resource: lifecycle::PauseCommands,
    },
    /// Replicate all federated data
    Replicate {
        #[command(subcommand)]
        resource: lifecycle::ReplicateCommands,
    },
    /// Notify federation participants
    Notify {
        #[command(subcommand)]
        resource: lifecycle::NotifyCommands,
    },
    /// Connect a topic subscriber
    Connect {
        #[command(subcommand)]
        resource: lifecycle::SubscriberCommands,
    },
    /// Disconnect a topic subscriber
    Disconnect {
        #[command(subcommand)]
        resource: lifecycle::SubscriberCommands,
    },
    /// Truncate a cache
    Truncate {
        #[command(subcommand)]
        resource: lifecycle::TruncateCommands,
    },
    /// Compact elastic data journals
    Compact {
        #[command(subcommand)]
        resource: lifecycle::CompactCommands,
    },
    /// Reset statistics
    Reset {
        #[command(subcommand)]
        resource: lifecycle::ResetCommands,
    },
    /// Create a snapshot
    Create {
        #[command(subcommand)]
        resource: persistence::SnapshotCommands,
    },
    /// Recover a snapshot
    Recover {
        #[command(subcommand)]
        resource: persistence::SnapshotCommands,
    },
    /// Archive a snapshot
    Archive {
        #[command(subcommand)]
        resource: persistence::SnapshotCommands,
    },
    /// Retrieve an archived snapshot or member thread dumps
    Retrieve {
        #[command(subcommand)]
        resource: persistence::RetrieveCommands,
    },
    /// Force recovery of a service
    Force {
        #[command(subcommand)]
        resource: persistence::ForceCommands,
    },
    /// Dump a Flight Recording or the cluster heap
    Dump {
        #[command(subcommand)]
        resource: diagnostics::DumpCommands,
    },
    /// Log cluster state
    Log {
        #[command(subcommand)]
        resource: diagnostics::LogCommands,
    },
    /// Configure tracing
    Configure {
        #[command(subcommand)]
        resource: diagnostics::ConfigureCommands,
    },
    /// Discover clusters through their name service
    Discover {
        #[command(subcommand)]
        resource: discovery::DiscoverCommands,
    },
    /// Query a cluster's name service
    Nslookup(discovery::NslookupArgs),
    /// Show the cohctl version
    Version {
        /// Check whether a newer release is available
        #[arg(short = 'u', long)]
        check_updates: bool,
    },
}

impl Commands {
    fn run(self, ctx: &mut AppContext, yes: bool) -> Result<(), AppError> {
        match self {
            Commands::Get { resource } => resource.run(ctx),
            Commands::Describe { resource } => resource.run(ctx),
            Commands::Set { resource } => resource.run(ctx, yes),
            Commands::Clear { resource } => resource.run(ctx, yes),
            Commands::Add { resource } => resource.run(ctx),
            Commands::Remove { resource } => resource.run(ctx, yes),
            Commands::Shutdown { resource } => resource.run(ctx, yes),
            Commands::Suspend { resource } => resource.suspend(ctx, yes),
            Commands::Resume { resource } => resource.resume(ctx, yes),
            Commands::Start { resource } => resource.run(ctx, yes),
            Commands::Stop { resource } => resource.run(ctx, yes),
            Commands::Pause { resource } => resource.run(ctx, yes),
            Commands::Replicate { resource } => resource.run(ctx, yes),
            Commands::Notify { resource } => resource.run(ctx, yes),
            Commands::Connect { resource } => resource.run(ctx, true, yes),
            Commands::Disconnect { resource } => resource.run(ctx, false, yes),
            Commands::Truncate { resource } => resource.run(ctx, yes),
            Commands::Compact { resource } => resource.run(ctx, yes),
            Commands::Reset { resource } => resource.run(ctx, yes),
            Commands::Create { resource } => resource.create(ctx, yes),
            Commands::Recover { resource } => resource.recover(ctx, yes),
            Commands::Archive { resource } => resource.archive(ctx, yes),
            Commands::Retrieve { resource } => resource.run(ctx, yes),
            Commands::Force { resource } => resource.run(ctx, yes),
            Commands::Dump { resource } => resource.run(ctx, yes),
            Commands::Log { resource } => resource.run(ctx, yes),
            Commands::Configure { resource } => resource.run(ctx, yes),
            Commands::Discover { resource } => resource.run(ctx, yes),
            Commands::Nslookup(args) => args.run(ctx),
            Commands::Version { check_updates } => {
                let config = ctx.store().config();
                let timeout =
                    HttpSettings::new(config.request_timeout, config.ignore_invalid_certs).timeout;
                let check =
                    check_updates.then_some(|| fetch_latest_version(LATEST_RELEASE_URL, timeout));
                print_result(show_version(check))
            }
        }
    }
}

/// Print a read verb's output, repeating it while `--watch` is set.
fn watch_output<F>(ctx: &AppContext, frame: F) -> Result<(), AppError>
where
    F: FnMut() -> Result<String, AppError>,
{
    emit(ctx.options().watch, frame)
}

/// Print a read verb's output once, ignoring `--watch`.
fn print_once<F>(ctx: &AppContext, frame: F) -> Result<(), AppError>
where
    F: FnMut() -> Result<String, AppError>,
{
    emit(ctx.options().watch.disabled(), frame)
}

fn emit<F>(options: WatchOptions, frame: F) -> Result<(), AppError>
where
    F: FnMut() -> Result<String, AppError>,
{
    let stop = if options.enabled { interrupt_flag()? } else { Arc::new(AtomicBool::new(false)) };
    run_watch(options, &stop, &mut io::stdout().lock(), frame)
}

fn print_result(text: String) -> Result<(), AppError> {
    print!("{text}");
    Ok(())
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let Cli { global, command } = cli;
    let config_dir = match &global.config_dir {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };
    let store = ConfigStore::load(&config_dir, global.config.as_deref())?;
    init_logging(&config_dir, store.config().debug);
    let options = global.options()?;

    let settings =
        HttpSettings::new(store.config().request_timeout, store.config().ignore_invalid_certs);
    let name_service = TcpNameServiceClient::new(settings.timeout, NAME_SERVICE_RETRIES);
    let password_source =
        if global.stdin { PasswordSource::Stdin } else { PasswordSource::Terminal };
    let fetchers = HttpFetcherFactory::new(settings, global.username.clone(), password_source);

    let mut ctx = AppContext::new(store, options, Box::new(fetchers), Box::new(name_service));
    command.run(&mut ctx, global.yes)
}

/// Entry point for the CLI.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = execute(cli) {
        let exit_code = e.exit_code();
        if exit_code == 0 {
            println!("{e}");
        } else {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
        }
        std::process::exit(exit_code);
    }
}
