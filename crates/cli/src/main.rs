use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use waypoint_agents::ConciergePipeline;
use waypoint_core::{PipelineError, PromptBuilder};
use waypoint_geo::{GeoGateway, GoogleMapsClient, GoogleMapsConfig};
use waypoint_llm::{OllamaBackend, OllamaConfig};
use waypoint_observability::{init_tracing, AppMetrics};

type Pipeline = ConciergePipeline<OllamaBackend, GoogleMapsClient>;

#[derive(Debug, Parser)]
#[command(name = "waypoint")]
#[command(about = "Waypoint location assistant CLI")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(flatten)]
    maps: MapsArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct BackendArgs {
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = waypoint_llm::DEFAULT_BASE_URL)]
    ollama_url: String,

    #[arg(long, env = "OLLAMA_MODEL", default_value = waypoint_llm::DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "WAYPOINT_BACKEND_TIMEOUT_SECONDS", default_value_t = 120)]
    backend_timeout: u64,
}

#[derive(Debug, Args)]
struct MapsArgs {
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    maps_key: Option<String>,

    #[arg(long, env = "GOOGLE_MAPS_BASE_URL", default_value = waypoint_geo::DEFAULT_BASE_URL)]
    maps_url: String,

    #[arg(long, env = "WAYPOINT_GATEWAY_TIMEOUT_SECONDS", default_value_t = 20)]
    gateway_timeout: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive loop; every line is handled on its own.
    Chat,
    /// Handle one message and print the full turn as JSON.
    Ask { message: String },
    /// Print only the classified intent record.
    Classify { message: String },
    /// Print the classification prompt without calling the backend.
    Prompt { message: String },
    Places { query: String },
    Directions { origin: String, destination: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing("waypoint_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Prompt { message } => {
            println!("{}", PromptBuilder::new().classification(&message));
        }
        Command::Places { query } => {
            let gateway = build_gateway(&cli.maps)?;
            let result = gateway.search_places(&query).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Directions {
            origin,
            destination,
        } => {
            let gateway = build_gateway(&cli.maps)?;
            let result = gateway.get_directions(&origin, &destination).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Chat => {
            let pipeline = build_pipeline(&cli.backend, &cli.maps)?;
            run_chat(pipeline).await?;
        }
        Command::Ask { message } => {
            let pipeline = build_pipeline(&cli.backend, &cli.maps)?;
            match pipeline.handle(&message).await {
                Ok(turn) => println!("{}", serde_json::to_string_pretty(&turn)?),
                Err(err) => {
                    println!("{}", error_payload(&err)?);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Classify { message } => {
            let pipeline = build_pipeline(&cli.backend, &cli.maps)?;
            match pipeline.classify(&message).await {
                Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                Err(err) => {
                    println!("{}", error_payload(&err)?);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_chat(pipeline: Pipeline) -> Result<()> {
    println!("Waypoint chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        match pipeline.handle(message).await {
            Ok(turn) => {
                println!("\n{}\n", turn.final_reply);
                if turn.intent_record.awaits_origin() {
                    println!("(send a new message that names your starting point)\n");
                }
            }
            Err(err) => eprintln!("\n[{}] {}\n", err.kind(), err.reason()),
        }
    }

    Ok(())
}

fn build_pipeline(backend: &BackendArgs, maps: &MapsArgs) -> Result<Pipeline> {
    let backend = OllamaBackend::new(OllamaConfig {
        base_url: backend.ollama_url.clone(),
        model: backend.model.clone(),
        timeout: Duration::from_secs(backend.backend_timeout.max(1)),
    })
    .context("failed to build generative backend client")?;

    Ok(ConciergePipeline::new(
        Arc::new(backend),
        Arc::new(build_gateway(maps)?),
        AppMetrics::shared(),
    ))
}

fn build_gateway(maps: &MapsArgs) -> Result<GoogleMapsClient> {
    GoogleMapsClient::new(GoogleMapsConfig {
        api_key: maps.maps_key.clone(),
        base_url: maps.maps_url.clone(),
        timeout: Duration::from_secs(maps.gateway_timeout.max(1)),
        ..GoogleMapsConfig::default()
    })
    .context("failed to build Google Maps client")
}

fn error_payload(err: &PipelineError) -> Result<String> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "kind": err.kind(),
        "llm_raw": err.raw(),
        "reason": err.reason(),
    }))?)
}
