//! Command line arguments.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init-db` | Drop and recreate both tables |
//! | `demo` | Add, read, update, read and delete a sample index |
//! | `show <id>` | Print one index as JSON |

use clap::{Parser, Subcommand};

/// Stock index repository over SQLite
#[derive(Debug, Parser)]
#[command(name = "stockindex", author, version, about)]
pub struct Cli {
    /// Data directory holding the database file (overrides STOCKINDEX_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Drop and recreate the schema, discarding all stored indices.
    InitDb,
    /// Run the add / update / delete walkthrough against index 1.
    Demo,
    /// Print an index and its derived statistics.
    Show {
        /// Index identifier.
        id: i64,
        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}
