use clap::Parser;
use signalchain::cli::commands::{Cli, Commands};
use signalchain::config::Config;
use signalchain::domain::ports::event_source::EventSource;
use signalchain::infrastructure::sinks::backend::BackendSignalSink;
use signalchain::logger::setup_logger;
use signalchain::SignalChain;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    setup_logger();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(mut config: Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run {
            question,
            parallelism,
            quantity,
            source,
            events_file,
            no_save,
        } => {
            if let Some(n) = parallelism {
                config.parallelism = n;
            }
            if let Some(q) = quantity {
                config.quantity_semantics = q.parse().map_err(|e: String| e)?;
            }
            if let Some(s) = source {
                config.source = s.parse().map_err(|e: String| e)?;
            }
            if let Some(path) = events_file {
                config.events_file = path;
            }

            let chain = SignalChain::new(&config)?;
            let outcome = chain.run(&question, !no_save).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Tools => {
            let tools = SignalChain::declared_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Commands::Events { question } => {
            let source = SignalChain::event_source(&config)?;
            let events = source.fetch(&question).await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Commands::Signals => {
            let url = config.backend_url.as_deref().ok_or("BACKEND_URL is not set")?;
            let signals = BackendSignalSink::new(url).list().await?;
            println!("{}", serde_json::to_string_pretty(&signals)?);
        }
    }
    Ok(())
}
