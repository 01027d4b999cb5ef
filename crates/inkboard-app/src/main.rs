//! Command-line entry point.

use clap::Parser;
use inkboard_app::{AppError, Cli, commands};
use inkboard_core::config::{Backend, Config};
use inkboard_core::session::Session;
use inkboard_core::store::CanvasStore;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env_from(|key| std::env::var(key).ok())?;
            config
        }
        None => Config::load()?,
    };
    if cli.local {
        config.backend = Backend::Local;
    }

    let store: Arc<dyn CanvasStore> = Arc::from(config.open_store()?);
    let mut session = Session::new(store);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&mut session, cli.command, &mut out, ask).await
}

/// Ask a yes/no question on the terminal. Anything but "y"/"yes" is no.
fn ask(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
