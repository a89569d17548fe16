use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use prospectd::Result;
use std::io;

#[derive(Parser)]
#[command(name = "prospectd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prospecting Agent Workspace Bootstrapper", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the workspace in the current directory
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Rewrite the manifest and agent wiring even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// Install dependencies for all MCP server sub-projects
    Install,

    /// Credential file operations
    #[command(subcommand)]
    Config(prospectd::cli::configure::ConfigCommands),

    /// OAuth operations for the spreadsheet server
    #[command(subcommand)]
    Auth(prospectd::cli::auth::AuthCommands),

    /// Launch the interactive agent
    Launch,

    /// Show workspace configuration status
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { name, force } => {
            prospectd::cli::init::run(name.as_deref(), force).await?;
        }

        Commands::Install => {
            prospectd::cli::install::run().await?;
        }

        Commands::Config(cmd) => {
            prospectd::cli::configure::run(cmd).await?;
        }

        Commands::Auth(cmd) => {
            prospectd::cli::auth::run(cmd).await?;
        }

        Commands::Launch => {
            prospectd::cli::launch::run().await?;
        }

        Commands::Status { json } => {
            prospectd::cli::status::run(json).await?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "prospectd", &mut io::stdout());
        }
    }

    Ok(())
}
