mod cli;
mod commands;
mod config;
mod decode;
mod error;
mod lines;
mod ollama;
mod process;
mod testutil;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use log::debug;
use std::io::Write;

use error::OllamaError;
use ollama::Ollama;
use process::SystemSpawner;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        let code = match e.downcast_ref::<OllamaError>() {
            Some(err) => {
                if err.should_report() {
                    eprintln!("error: {}", err);
                }
                err.exit_code()
            }
            None => {
                eprintln!("error: {:#}", e);
                1
            }
        };
        std::process::exit(code);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_default_config()?,
    };
    let ollama = Ollama::new(&config.ollama);
    let decoding = config.output.decoding;

    match cli.command {
        Command::Models => {
            let result = commands::cmd_models(&SystemSpawner, &ollama, decoding)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(commands::format_models_human(&result).as_bytes())
                .map_err(OllamaError::from)?;
            stdout.flush().map_err(OllamaError::from)?;
        }
        Command::Chat { model, prompt } => {
            let mut stdout = std::io::stdout().lock();
            let result =
                commands::cmd_chat(&SystemSpawner, &ollama, &model, &prompt, decoding, &mut stdout)?;
            debug!("streamed {} lines", result.lines);
        }
    }
    Ok(())
}
