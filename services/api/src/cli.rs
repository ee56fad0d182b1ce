use crate::commands;
use crate::infra::open_service;
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lease_vault::error::AppError;
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Lease Vault",
    about = "Manage farmland lease templates, drafts, and completed agreements",
    version
)]
struct Cli {
    /// Documents directory holding the `Leases` tree (overrides LEASE_STORAGE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect master templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
    /// Manage working drafts
    Drafts {
        #[command(subcommand)]
        command: DraftsCommand,
    },
    /// Create and browse completed agreements
    Leases {
        #[command(subcommand)]
        command: LeasesCommand,
    },
    /// Print the SHA-256 fingerprint of a file
    Hash { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum TemplatesCommand {
    /// List master template names
    List,
}

#[derive(Subcommand, Debug)]
enum DraftsCommand {
    /// Copy a master template into the working tier
    Copy { template: String, working: String },
    /// List working draft names
    List,
}

#[derive(Subcommand, Debug)]
enum LeasesCommand {
    /// Finalize a working draft into a completed agreement
    Create(CreateLeaseArgs),
    /// List growing years that hold completed agreements
    Years,
    /// List completed agreements for one growing year
    Files {
        year: i32,
        /// Emit a CSV manifest instead of a listing
        #[arg(long)]
        csv: bool,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct CreateLeaseArgs {
    /// Working draft to finalize
    #[arg(long)]
    pub(crate) draft: String,
    #[arg(long)]
    pub(crate) property: Option<String>,
    #[arg(long)]
    pub(crate) farmer: Option<String>,
    /// Growing year the agreement covers
    #[arg(long)]
    pub(crate) year: i32,
    #[arg(long)]
    pub(crate) lease_id: Option<String>,
    #[arg(long)]
    pub(crate) lease_type: Option<String>,
    /// Term start (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Term end (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) rent: Option<Decimal>,
    /// Rent payment frequency, e.g. annually
    #[arg(long)]
    pub(crate) frequency: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let root = cli.root;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));
    let mut out = io::stdout();

    match command {
        Command::Serve(args) => server::run(args, root).await,
        Command::Templates {
            command: TemplatesCommand::List,
        } => commands::list_templates(&open_service(root)?, &mut out),
        Command::Drafts {
            command: DraftsCommand::Copy { template, working },
        } => commands::copy_draft(&open_service(root)?, &template, &working, &mut out),
        Command::Drafts {
            command: DraftsCommand::List,
        } => commands::list_drafts(&open_service(root)?, &mut out),
        Command::Leases {
            command: LeasesCommand::Create(args),
        } => commands::create_lease(&open_service(root)?, args, &mut out),
        Command::Leases {
            command: LeasesCommand::Years,
        } => commands::list_years(&open_service(root)?, &mut out),
        Command::Leases {
            command: LeasesCommand::Files { year, csv },
        } => commands::list_files(&open_service(root)?, year, csv, &mut out),
        Command::Hash { path } => commands::hash(&path, &mut out),
    }
}
