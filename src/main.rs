use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brief::app::AppContext;
use brief::cli::commands::{self, Session};
use brief::cli::shell::Shell;
use brief::cli::Cli;
use brief::config::Config;
use brief::workflow::LineConfirm;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.store.db_path = Some(db);
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Some(command) => {
            let mut session = Session::new(&ctx.config);
            let stdin = io::stdin();
            let mut confirm = LineConfirm(stdin.lock());
            let mut stdout = io::stdout();
            commands::execute(&ctx, &mut session, command, &mut confirm, &mut stdout).await?;
        }
        None => {
            let stdin = io::stdin();
            let mut shell = Shell::new(&ctx, stdin.lock(), io::stdout());
            shell.run().await?;
        }
    }

    Ok(())
}
