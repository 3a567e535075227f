use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ai-cli",
    version,
    about = "AI CLI Tool: interact with locally installed Ollama models"
)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all Ollama models installed locally
    Models,
    /// Run a model with a prompt and stream the output
    Chat {
        /// Model to run (e.g., "llama2")
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        model: String,
        /// Prompt passed to the model as-is (put `--` before prompts that look
        /// like flags, e.g. `chat llama2 -- --help`)
        #[arg(allow_hyphen_values = true)]
        prompt: String,
    },
}
