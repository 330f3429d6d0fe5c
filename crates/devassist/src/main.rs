use anyhow::Result;
use clap::{Parser, Subcommand};
use devassist_common::logger::{self, LOG_FILE_NAME};
use devassist_common::AppConfig;
use devassist_llm::{HuggingFaceProvider, PipelineSet, Task};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    match find_project_root().map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => {
            dotenv::from_path(&env_path).ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
}

#[derive(Parser)]
#[command(name = "devassist")]
#[command(about = "AI developer's assistant: text summaries, code review and log analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    // CLI flags override the environment
    if let Some(Commands::Serve { host, port }) = &cli.command {
        if let Some(host) = host {
            std::env::set_var("SERVER_HOST", host);
        }
        if let Some(port) = port {
            std::env::set_var("SERVER_PORT", port.to_string());
        }
    }

    let config = AppConfig::from_env()?;
    if let Err(e) = logger::setup_logging(&config.log_dir, &config.log_level) {
        eprintln!("File logging unavailable ({}), logging to console only", e);
        logger::setup_console_logging(&config.log_level)?;
    }

    tracing::info!("DevAssist starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Uploads: {}", config.upload_dir.display());
    tracing::info!("  Log file: {}", config.get_log_path(LOG_FILE_NAME).display());

    let provider = HuggingFaceProvider::new(
        config.hf_inference_url.clone(),
        config.hf_hub_url.clone(),
        config.huggingface_token.clone(),
        config.generation_timeout(),
    )?;

    // Startup fails if any model cannot be loaded
    let pipelines = PipelineSet::load(&provider, &config).await?;
    for task in Task::ALL {
        tracing::info!("  {}: {}", task, pipelines.get(task).model_id());
    }

    println!("Server listening on http://{}", config.server_bind_address());

    devassist_server::start_server(config, pipelines).await?;

    Ok(())
}
