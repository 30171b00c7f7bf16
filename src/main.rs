//! `optica` command line entry point.
//!
//! Lists, shows and edits the shop's remote collections from a terminal,
//! and runs the in-memory sandbox backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use optica_client::config::{ClientConfig, SandboxConfig, parse_env_bool};
use optica_client::domain::{
    Appointment, Client, Invoice, MedicalHistoryEntry, Prescription, Promotion, Record, RecordId,
    Resource, Sale,
};
use optica_client::notice::NoticeBoard;
use optica_client::sandbox;
use optica_client::service::ResourceService;
use optica_client::view::{SortDirection, SortKey, ViewQuery};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a collection and print the filtered, sorted view
    List {
        /// Collection path or name (`ventas`, `sales`, ...)
        resource: Resource,
        /// Case-insensitive text matched against the searchable fields
        #[arg(short, long, default_value = "")]
        search: String,
        /// Exact category value, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,
        /// Earliest record date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,
        /// Latest record date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
        /// Sort key: `date` or `amount`
        #[arg(long, default_value = "date")]
        sort: SortKey,
        /// Oldest / smallest first
        #[arg(long)]
        asc: bool,
    },
    /// Fetch and print one record
    Show { resource: Resource, id: String },
    /// Create a record from a JSON object
    Create { resource: Resource, json: String },
    /// Merge a JSON object into a record and save it
    Update {
        resource: Resource,
        id: String,
        json: String,
    },
    /// Delete a record
    Delete { resource: Resource, id: String },
    /// Run the in-memory sandbox backend
    Sandbox,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let resource = match &cli.command {
        Command::Sandbox => {
            let config = SandboxConfig::from_env()?;
            tracing::info!(addr = %config.listen_addr, "starting sandbox");
            return Ok(sandbox::serve(&config).await?);
        }
        Command::List { resource, .. }
        | Command::Show { resource, .. }
        | Command::Create { resource, .. }
        | Command::Update { resource, .. }
        | Command::Delete { resource, .. } => *resource,
    };

    let config = ClientConfig::from_env()?;

    match resource {
        Resource::Clients => run::<Client>(cli.command, &config).await,
        Resource::Appointments => run::<Appointment>(cli.command, &config).await,
        Resource::Sales => run::<Sale>(cli.command, &config).await,
        Resource::Invoices => run::<Invoice>(cli.command, &config).await,
        Resource::Promotions => run::<Promotion>(cli.command, &config).await,
        Resource::MedicalHistory => run::<MedicalHistoryEntry>(cli.command, &config).await,
        Resource::Prescriptions => run::<Prescription>(cli.command, &config).await,
    }
}

/// Logs go to stderr so stdout stays pipeable JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if parse_env_bool("OPTICA_LOG_JSON", false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run<R: Record>(command: Command, config: &ClientConfig) -> Result<()> {
    let service = ResourceService::<R>::from_config(config, Arc::new(NoticeBoard::new()))?;
    tracing::debug!(
        base_url = %service.api().base_url(),
        resource = %R::RESOURCE,
        "using backend"
    );

    match command {
        Command::List {
            search,
            category,
            from,
            to,
            sort,
            asc,
            ..
        } => {
            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let query = ViewQuery::new()
                .search(&search)
                .category(&category)
                .between(from.as_deref(), to.as_deref())?
                .sort_by(sort)
                .direction(direction);
            service.load().await?;
            let view = service.view(&query).await;
            tracing::info!(shown = view.len(), total = service.records().await.len(), "view derived");
            print_json(&view)
        }
        Command::Show { id, .. } => print_json(&service.fetch_one(&RecordId::new(id)).await?),
        Command::Create { json, .. } => {
            let payload = parse_object(&json)?;
            print_json(&service.create(&payload).await?)
        }
        Command::Update { id, json, .. } => {
            let changes = parse_object(&json)?;
            // Updates merge into the loaded record, so load first.
            service.load().await?;
            print_json(&service.update(&RecordId::new(id), &changes).await?)
        }
        Command::Delete { id, .. } => {
            let id = RecordId::new(id);
            service.delete(&id).await?;
            println!("deleted {} {id}", R::RESOURCE);
            Ok(())
        }
        Command::Sandbox => Ok(()),
    }
}

fn parse_object(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).context("argument is not valid JSON")?;
    anyhow::ensure!(value.is_object(), "argument must be a JSON object");
    Ok(value)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
