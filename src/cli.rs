use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Keep a Notion manga tracker up to date from the terminal.
#[derive(Debug, Parser)]
#[command(name = "update-mangas", author, version, about)]
pub struct Cli {
    /// TOML config file (defaults to the per-user config directory).
    #[arg(long, global = true, env = "UPDATE_MANGAS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bump the chapter of every unfinished manga in the tracked category.
    AllShonenJump(BulkArgs),
    /// Bump the chapter of one manga, looked up by exact title.
    UpdateSingle(SingleArgs),
    /// Mark mangas as finished.
    Finished(FinishedArgs),
    /// Show the titles of all unfinished mangas.
    List,
}

#[derive(Debug, Args)]
pub struct BulkArgs {
    /// Titles to leave untouched.
    #[arg(short, long, value_name = "NAME", num_args = 1..)]
    pub ignore: Vec<String>,

    /// Print the updates instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct SingleArgs {
    pub manga_name: String,

    /// Choose interactively when several pages share the title.
    #[arg(long)]
    pub pick: bool,

    /// Print the update instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct FinishedArgs {
    #[arg(required = true)]
    pub manga_names: Vec<String>,

    /// Choose interactively when several pages share a title.
    #[arg(long)]
    pub pick: bool,

    /// Print the updates instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}
