use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use update_mangas::cli::{Cli, Command};
use update_mangas::commands;
use update_mangas::config::get_config;
use update_mangas::notion::NotionSession;

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> Result<()> {
    update_mangas::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let cfg = get_config(cli.config.as_deref())?;
    let session = NotionSession::new(&cfg).context("build notion session")?;

    match cli.command {
        Command::AllShonenJump(args) => commands::all_shonen_jump(&session, args)?,
        Command::UpdateSingle(args) => commands::update_single(&session, args)?,
        Command::Finished(args) => commands::finished(&session, args)?,
        Command::List => commands::list(&session)?,
    }

    Ok(())
}
