//! Tandem CLI — command-line interface for the multi-agent demo proxy.
//!
//! Reuses the same core domain logic (tandem-core) and server bootstrap
//! (tandem-server) that power an embedded deployment.

mod commands;

use clap::{Parser, Subcommand};

/// Tandem CLI — edge proxy and agent-workflow timeline
#[derive(Parser)]
#[command(name = "tandem", version, about = "Tandem CLI — edge proxy and agent-workflow timeline")]
pub struct Cli {
    /// Base URL of a running tandem proxy (for ask/workflow/demo)
    #[arg(long, env = "TANDEM_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tandem HTTP proxy server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Single-shot completion through the proxy
    Ask {
        /// The prompt to send
        prompt: String,
    },

    /// Run one named agent workflow and print its timeline
    Workflow {
        /// The prompt to send
        prompt: String,
        /// Workflow kind: editorial, dev, or a custom tag (passed through)
        #[arg(long, short = 'w', default_value = "editorial")]
        workflow: String,
    },

    /// Run the scripted multi-task demo against a running proxy
    Demo,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem_core=warn,tandem_server=warn,tandem_cli=info".into()),
        )
        .init();

    let result = match cli.command {
        Commands::Serve { host, port } => commands::serve::run(host, port).await,
        Commands::Ask { prompt } => commands::ask::run(&cli.api_url, &prompt).await,
        Commands::Workflow { prompt, workflow } => {
            commands::workflow::run(&cli.api_url, &prompt, &workflow).await
        }
        Commands::Demo => commands::demo::run(&cli.api_url).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
