//! CCH Config CLI
//!
//! Entry point for the `cch-config` command-line tool.

use clap::{Parser, Subcommand};
use cch_config::{
    ConditionKey, DashboardFileStore, EditorError, EditorSession, SettingKey, TabVisibility, Target,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cch-config")]
#[command(about = "Edit the compact custom header configuration of a dashboard", version)]
struct Cli {
    /// Dashboard JSON document holding the `cch` member
    #[arg(long, short = 'd', global = true, default_value = "ui-lovelace.json")]
    dashboard: PathBuf,

    /// TOML file overriding the builtin defaults
    #[arg(long, global = true)]
    defaults: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show effective values for the base config or an exception
    Show {
        /// Exception index (default: base config)
        #[arg(long, short = 'e')]
        exception: Option<usize>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Set a setting and save
    Set {
        /// Setting name (e.g. kiosk_mode)
        key: String,

        /// New value; an empty string clears the setting
        value: String,

        /// Exception index (default: base config)
        #[arg(long, short = 'e')]
        exception: Option<usize>,
    },

    /// Clear a setting so it inherits again, and save
    Unset {
        /// Setting name
        key: String,

        /// Exception index (default: base config)
        #[arg(long, short = 'e')]
        exception: Option<usize>,
    },

    /// Exception management commands
    Exceptions {
        #[command(subcommand)]
        action: ExceptionsCommands,
    },

    /// Drop stored values equal to their defaults and save
    Prune,
}

#[derive(Subcommand)]
enum ExceptionsCommands {
    /// List exceptions
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Append an empty exception
    Add,

    /// Delete an exception; later indices shift down
    Delete {
        /// Exception index
        index: usize,
    },

    /// Set a condition (user, user_agent, media_query); empty clears it
    Condition {
        /// Exception index
        index: usize,

        /// Condition name
        key: String,

        /// Matcher string
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut store = DashboardFileStore::new(&cli.dashboard);
    if let Some(path) = &cli.defaults {
        store = store.with_defaults_file(path);
    }

    let result = match cli.command {
        Commands::Show { exception, json } => run_show(store, target(exception), json),
        Commands::Set {
            key,
            value,
            exception,
        } => run_edit(store, |session| {
            session.set_field_str(target(exception), &key, &value).map(|_| ())
        }),
        Commands::Unset { key, exception } => run_edit(store, |session| {
            let key: SettingKey = key.parse()?;
            session.clear_field(target(exception), key).map(|_| ())
        }),
        Commands::Exceptions { action } => match action {
            ExceptionsCommands::List { json } => run_exceptions_list(store, json),
            ExceptionsCommands::Add => run_edit(store, |session| {
                let index = session.add_exception();
                println!("Added exception {}", index);
                Ok(())
            }),
            ExceptionsCommands::Delete { index } => {
                run_edit(store, |session| session.delete_exception(index).map(|_| ()))
            }
            ExceptionsCommands::Condition { index, key, value } => run_edit(store, |session| {
                let key: ConditionKey = key.parse()?;
                session
                    .set_exception_condition(index, key, &value)
                    .map(|_| ())
            }),
        },
        Commands::Prune => run_edit(store, |_| Ok(())),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn target(exception: Option<usize>) -> Target {
    exception.map_or(Target::Base, Target::Exception)
}

/// Open a session, apply one edit and save.
fn run_edit<F>(store: DashboardFileStore, edit: F) -> Result<(), EditorError>
where
    F: FnOnce(&mut EditorSession<DashboardFileStore>) -> Result<(), EditorError>,
{
    let mut session = EditorSession::open(store)?;
    edit(&mut session)?;
    debug!(dirty = session.is_dirty(), "edit applied");
    session.save()?;
    println!("Saved {}", session.store().path().display());
    Ok(())
}

fn run_show(store: DashboardFileStore, target: Target, json: bool) -> Result<(), EditorError> {
    let session = EditorSession::open(store)?;
    let scope = session.scope(target)?;
    let values = scope.snapshot()?;
    let clock = scope.clock()?;
    let tabs = scope.tab_visibility()?;

    if json {
        let mut map = Map::new();
        for (key, value) in &values {
            map.insert(key.as_str().to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
        }
        map.insert("clock".to_string(), Value::Bool(clock));
        match serde_json::to_string_pretty(&Value::Object(map)) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return Ok(());
    }

    let layer = scope.layer();
    for (key, value) in &values {
        let marker = if layer.contains(*key) { "*" } else { " " };
        println!("{} {:<22} {}", marker, key.as_str(), value);
    }
    println!("  {:<22} {}", "clock", clock);
    match tabs {
        TabVisibility::Show(ids) => println!("  {:<22} only {}", "tabs", ids.join(", ")),
        TabVisibility::Hide(ids) => println!("  {:<22} all but {}", "tabs", ids.join(", ")),
        TabVisibility::All => println!("  {:<22} all", "tabs"),
    }
    Ok(())
}

fn run_exceptions_list(store: DashboardFileStore, json: bool) -> Result<(), EditorError> {
    let session = EditorSession::open(store)?;
    let exceptions = &session.config().exceptions;

    if json {
        match serde_json::to_string_pretty(exceptions) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return Ok(());
    }

    if exceptions.is_empty() {
        println!("No exceptions configured");
        return Ok(());
    }
    for (index, exception) in exceptions.iter().enumerate() {
        println!("[{}] {} ({} settings)", index, exception.label(), exception.config.len());
    }
    Ok(())
}
