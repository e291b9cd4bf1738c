use crate::application::prompts::DEFAULT_QUESTION;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signalchain", about = "LLM-driven trading signal pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: retrieve events, sample raw signals, aggregate, save
    Run {
        /// Question put to the model
        #[arg(long, default_value = DEFAULT_QUESTION)]
        question: String,
        /// Number of raw signals sampled in parallel
        #[arg(long)]
        parallelism: Option<usize>,
        /// Meaning of the quantity field (absolute, percentage)
        #[arg(long)]
        quantity: Option<String>,
        /// Event source (file, http)
        #[arg(long)]
        source: Option<String>,
        /// Events file for the file source
        #[arg(long)]
        events_file: Option<PathBuf>,
        /// Skip saving the final signal to the backend
        #[arg(long)]
        no_save: bool,
    },
    /// Print the declared tool set as JSON
    Tools,
    /// Print what the configured event source returns
    Events {
        #[arg(long, default_value = DEFAULT_QUESTION)]
        question: String,
    },
    /// List signals stored by the backend
    Signals,
}
