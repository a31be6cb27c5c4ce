// SPDX-License-Identifier: MIT

use anyhow::Context;
use blogsmith_rs::adk::client::{ModelClient, TextGenerationClient};
use blogsmith_rs::adk::error::BlogsmithError;
use blogsmith_rs::adk::model::openai::OpenAIModel;
use blogsmith_rs::blog::config::{AppConfig, ConfigLoader};
use blogsmith_rs::blog::persist::save_markdown;
use blogsmith_rs::blog::workflow::graph::{BlogGraph, Usecase};
use blogsmith_rs::blog::workflow::state::WorkflowState;
use blogsmith_rs::blog::workflow::steps::decide_route;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a blog post, optionally translated
    Generate {
        /// Topic of the post
        #[arg(short, long)]
        topic: String,

        /// Target language (e.g. hindi, french)
        #[arg(short, long)]
        language: Option<String>,

        /// Graph variant: topic or language
        #[arg(short, long)]
        usecase: Option<Usecase>,

        /// Directory the Markdown file is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the post without writing a file
        #[arg(long)]
        no_save: bool,

        /// Print the post as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// List the supported translation languages
    Languages,
    /// Show which route a language would take
    Route {
        /// Target language to check
        #[arg(short, long)]
        language: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn build_client(config: &AppConfig) -> Result<Arc<dyn TextGenerationClient>, BlogsmithError> {
    let settings = &config.model;
    let model = OpenAIModel::with_endpoint(
        settings.provider.clone(),
        settings.model_name.clone(),
        settings.base_url.clone(),
        &settings.api_key_env,
    )?;
    log::info!(
        "Using provider: {} with model: {}",
        settings.provider,
        settings.model_name
    );
    let client = ModelClient::new(Arc::new(model)).with_config(settings.generation_config());
    Ok(Arc::new(client))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Commands::Generate {
            topic,
            language,
            usecase,
            output_dir,
            no_save,
            json,
        } => {
            let client = build_client(&config)?;
            let mut graph = BlogGraph::from_config(client, &config);
            if let Some(usecase) = usecase {
                graph = graph.with_usecase(usecase);
            }

            let blog = graph.run(&topic, language.as_deref()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&blog)?);
            } else {
                println!("# {}\n\n{}", blog.title, blog.content);
            }

            if !no_save {
                let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
                let path = save_markdown(&blog, &dir).await?;
                eprintln!("Saved to {}", path.display());
            }
        }
        Commands::Languages => {
            for language in config.language_registry().iter() {
                println!("{}\t{}", language.code, language.prompt_name());
            }
        }
        Commands::Route { language } => {
            // The topic only has to be non-blank; routing never reads it
            let state = WorkflowState::new("route", language.as_deref())?;
            let route = decide_route(&state, &config.language_registry());
            println!("{}", route.label());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let client_error = e
                .downcast_ref::<BlogsmithError>()
                .map(BlogsmithError::is_client_error)
                .unwrap_or(false);
            log::error!("{:#}", e);
            if client_error {
                eprintln!("Error (400): {:#}", e);
                ExitCode::from(2)
            } else {
                eprintln!("Error (503): {:#}", e);
                ExitCode::FAILURE
            }
        }
    }
}
