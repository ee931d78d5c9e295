//! `mediacat` - CLI for mediacatalog
//!
//! Adds media file records to a `SQLite` catalog and reports on it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use mediacatalog::cli::{AddCommand, Cli, Command, ConfigCommand};
use mediacatalog::{init_logging, shared, Catalog, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Config subcommands report on configuration files themselves, so they
    // do not go through the global load.
    match cli.command {
        Command::Config(config_cmd) => {
            handle_config(cli.config.as_deref(), cli.database, &config_cmd)
        }
        Command::Add(add_cmd) => handle_add(&load_config(cli.config, cli.database)?, add_cmd),
        Command::Demo => handle_demo(&load_config(cli.config, cli.database)?),
        Command::Status(status_cmd) => {
            handle_status(&load_config(cli.config, cli.database)?, status_cmd.json)
        }
    }
}

fn load_config(file: Option<PathBuf>, database: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load_from(file).context("loading configuration")?;
    if let Some(database) = database {
        config.storage.database_path = Some(database);
    }
    Ok(config)
}

fn handle_add(config: &Config, cmd: AddCommand) -> Result<()> {
    let json = cmd.json;
    let file = cmd.into_file_info(Utc::now());

    let catalog = Catalog::from_config(config)?;
    catalog
        .add_file(&file)
        .with_context(|| format!("adding {}", file.path))?;
    catalog.close()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        println!("Added {}", file.path);
    }
    Ok(())
}

fn handle_demo(config: &Config) -> Result<()> {
    let file = shared::run_demo(config, Utc::now()).context("adding sample record")?;
    println!("Added sample record {}", file.path);
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let path = config.database_path();
    let exists = path.exists();
    let stats = Catalog::stats_at(&path)
        .with_context(|| format!("reading catalog at {}", path.display()))?;

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "exists": exists,
            "synchronous": config.storage.synchronous,
            "total_files": stats.total_files,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("mediacat status");
        println!("---------------");
        if exists {
            println!("Database:      {}", path.display());
        } else {
            println!("Database:      {} (not created yet)", path.display());
        }
        println!("Synchronous:   {}", config.storage.synchronous);
        println!("Files:         {}", stats.total_files);
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(
    global: Option<&Path>,
    database: Option<PathBuf>,
    cmd: &ConfigCommand,
) -> Result<()> {
    let path = cmd.target_file(global);
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(Some(path), database)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Synchronous:        {}", config.storage.synchronous);
            }
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Validate { .. } => {
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("configuration {} is invalid", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
