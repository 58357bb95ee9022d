//! repowiki CLI - browse and search a repository-hosted Markdown wiki.
//!
//! This is the entry point for the `repowiki` command-line interface.
//! Command implementations live in the `commands` module, one file per
//! subcommand.

use anyhow::{Context, Result};
use clap::Parser;
use repowiki_core::{Config, WikiSession};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;
    execute_command(cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose || cli.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: Cli) -> Result<()> {
    // Completions need no repository or session.
    if let Commands::Completions { shell } = &cli.command {
        commands::completions::execute(*shell);
        return Ok(());
    }

    let config = build_config(&cli)?;
    let mut session = WikiSession::new(config)?;

    match cli.command {
        Commands::Scan => commands::scan::execute(&mut session).await?,

        Commands::Search {
            query,
            limit,
            fast,
            output,
        } => commands::search::execute(&mut session, &query, limit, fast, output).await?,

        Commands::Show { page, raw } => commands::show::execute(&mut session, &page, raw).await?,

        Commands::Tree => commands::tree::execute(&mut session).await?,

        Commands::List { category, output } => {
            commands::list::execute(&mut session, category.as_deref(), output).await?;
        }

        Commands::Open { link } => commands::open::execute(&mut session, &link).await?,

        Commands::Random => commands::random::execute(&mut session).await?,

        Commands::Stats { output } => commands::stats::execute(&mut session, output).await?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("could not load configuration")?;

    if let Some(slug) = &cli.repo {
        config.set_repo_slug(slug)?;
    }
    if let Some(branch) = &cli.branch {
        config.repo.branch.clone_from(branch);
    }
    if let Some(root) = &cli.root {
        config.scan.pages_root.clone_from(root);
    }

    Ok(config)
}
