//! Command-line flags for `pessoas`, parsed with `clap`.
//!
//! Running `pessoas` with no subcommand starts the server.  The only
//! subcommand, `completions`, prints a shell completion script.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pessoas",
    author,
    version,
    about,
    long_about = "pessoas serves a register of people over HTTP, stored in SQLite",
    propagate_version = true
)] // Read from `Cargo.toml`
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Database file",
        long_help = "The SQLite file holding the pessoas table.  It is created on first start and reused afterwards.",
        default_value = "pessoas.db"
    )]
    pub dbfile: String,

    #[arg(
        short,
        long,
        help = "Store mailbox size",
        long_help = "The number of store requests allowed to wait for the database.  Further requests wait for a free slot.",
        default_value = "8"
    )]
    pub buffer: usize,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "No on-disk db file", long_help = "Keep the register in memory only.  Everything is lost when the server stops.")]
    pub memory_only: bool,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable Write Ahead Logging", long_help = "Disable SQLite Write Ahead Logging (WAL) and fall back to the rollback journal.")]
    pub disable_wal: bool,

    #[arg(short, long, help = "server listener port", default_value = "3000")]
    pub port: u16,

    #[arg(short, long, help = "server listener interface", default_value = "127.0.0.1")]
    pub interface: String,

    #[arg(
        long,
        help = "externally known base url for this server",
        long_help = "The base url used in the API docs and to open the browser.  Defaults to http://localhost:<port>."
    )]
    pub external_host: Option<String>,

    #[arg(long, help = "API docs UI path", default_value = "/api-docs")]
    pub uipath: String,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "disable API docs UI")]
    pub disable_ui: bool,

    #[arg(long, help = "HTML file served at /", default_value = "public/home.html")]
    pub home_page: String,

    #[arg(long, action = clap::ArgAction::SetTrue, help = "do not open a browser on start")]
    pub no_browser: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Completions {
        #[arg(short, long, action = clap::ArgAction::Set, help = "print script for shell tab completion", long_help = "Pipe the output of this command to a file or to a shell program as appropriate for 'bash', or 'zsh', etc... install via 'pessoas completions -s zsh > /usr/local/share/zsh/site-functions/_pessoas'")]
        shell: clap_complete::Shell,
    },
}
