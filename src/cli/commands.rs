use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::list::Direction;

#[derive(Parser)]
#[command(name = "mru", about = concat!("mru v", env!("CARGO_PKG_VERSION"), " - recently used files, pinned and grouped"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different recent-list file
    #[arg(short = 'S', long = "store", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an access to a file
    Add(AddArgs),
    /// Remove a file from the list
    Rm(PathArg),
    /// Pin a file to the top of the list
    Pin(PathArg),
    /// Unpin a file
    Unpin(PathArg),
    /// Move a file up or down within its section
    Mv(MvArgs),
    /// Show the list grouped by recency
    List(ListArgs),
    /// Remove all entries
    Clear(ClearArgs),
    /// Show or edit configuration
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct AddArgs {
    /// File path (relative paths resolve against the current directory)
    pub path: String,
    /// Pin the entry
    #[arg(long)]
    pub pin: bool,
}

#[derive(Args)]
pub struct PathArg {
    /// File path
    pub path: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Direction {
        match d {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

#[derive(Args)]
pub struct MvArgs {
    /// File path
    pub path: String,
    /// Which way to move
    #[arg(value_enum)]
    pub direction: DirectionArg,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show paths matching this regex
    #[arg(long)]
    pub filter: Option<String>,
    /// Only show one band (pinned, today, yesterday, this-week, last-week,
    /// this-month, last-month, older)
    #[arg(long)]
    pub band: Option<String>,
    /// Maximum number of entries to show
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Keep pinned entries
    #[arg(long)]
    pub keep_pinned: bool,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a configuration value (max-size, week-start)
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Key to set
    pub key: String,
    /// New value
    pub value: String,
}
