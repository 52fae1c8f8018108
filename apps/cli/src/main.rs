mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use stockindex_storage_sqlite::db;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_tracing();

    let db_path = db::init(&config.data_dir)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path, config.pool_size)?;

    match cli.command {
        Command::InitDb => commands::init_db(&pool),
        Command::Demo => commands::demo(&pool),
        Command::Show { id, pretty } => commands::show(&pool, id, pretty),
    }
}

fn init_tracing() {
    let log_format = std::env::var("STOCKINDEX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}
