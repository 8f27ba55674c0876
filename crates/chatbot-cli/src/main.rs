//! chatbot CLI: a floating chat widget backed by Gemini

use chatbot_engine::{
    api_key_from_env, Config, ConversationController, GeminiClient, GenerationCollaborator,
    ThemeVariant, TurnDispatcher, TurnStatus,
};
use chatbot_tui::Theme;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal chat widget with a hosted language model behind it
#[derive(Parser)]
#[command(name = "chatbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to send prompts to (overrides the config file)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Colour scheme: crimson or ember (overrides the config file)
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Write logs to this file while the widget is open
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat widget (default when no command specified)
    Tui,

    /// Send one prompt and print the reply
    Ask {
        /// Prompt text
        prompt: String,
    },

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(interactive, cli.log_file.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Tui) => run_async(cmd_tui(config)),
        Some(Commands::Ask { prompt }) => run_async(cmd_ask(config, prompt)),
        Some(Commands::Config { json }) => cmd_config(&config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn run_async(future: impl std::future::Future<Output = CliResult>) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

/// Install the tracing subscriber.
///
/// The widget owns the screen, so in interactive mode logs only go to
/// `log_file`, and nowhere without one. Other commands log to stderr.
fn init_logging(interactive: bool, log_file: Option<&Path>) -> CliResult {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (interactive, log_file) {
        (_, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        (true, None) => {}
        (false, None) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    if let Some(model) = &cli.model {
        config.model.clone_from(model);
    }
    if let Some(name) = &cli.theme {
        config.theme = ThemeVariant::from_name(name)
            .ok_or_else(|| format!("unknown theme '{name}' (expected crimson or ember)"))?;
    }

    Ok(config)
}

fn collaborator(config: &Config) -> Arc<dyn GenerationCollaborator> {
    let api_key = api_key_from_env().unwrap_or_default();
    Arc::new(GeminiClient::from_config(config, api_key))
}

async fn cmd_tui(config: Config) -> CliResult {
    info!(model = %config.model, theme = config.theme.name(), "opening chat widget");
    chatbot_tui::run_tui(collaborator(&config), Theme::from_variant(config.theme)).await
}

/// Run a single turn through the controller and print the reply.
async fn cmd_ask(config: Config, prompt: String) -> CliResult {
    let mut controller = ConversationController::new();
    controller.update_draft(prompt);
    let request = controller.submit().ok_or("prompt is empty")?;
    let turn = request.turn;

    let (dispatcher, mut outcomes) = TurnDispatcher::new(collaborator(&config));
    dispatcher.dispatch(request);
    let outcome = outcomes.recv().await.ok_or("generation task ended without a result")?;
    controller.resolve(outcome);

    match controller.turn_status(turn) {
        Some(TurnStatus::Failed { reason }) => Err(format!("no reply: {reason}").into()),
        _ => {
            let reply = controller
                .transcript()
                .reply_to(turn)
                .ok_or("no reply received")?;
            println!("{}", reply.text());
            Ok(())
        }
    }
}

fn cmd_config(config: &Config, json: bool) -> CliResult {
    let key_status = if api_key_from_env().is_some() {
        "set"
    } else {
        "unset"
    };

    if json {
        let mut value = serde_json::to_value(config)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("api_key".into(), key_status.into());
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Configuration\n");
    println!("  Model:      {}", config.model);
    println!("  Base URL:   {}", config.base_url);
    println!("  Theme:      {}", config.theme.name());
    println!("  API key:    {key_status}");
    println!();
    println!("Generation\n");
    println!("  temperature:       {}", config.generation.temperature);
    println!("  topP:              {}", config.generation.top_p);
    println!("  topK:              {}", config.generation.top_k);
    println!("  maxOutputTokens:   {}", config.generation.max_output_tokens);
    println!("  responseMimeType:  {}", config.generation.response_mime_type);

    Ok(())
}
