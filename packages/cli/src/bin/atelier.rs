use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::projects::ProjectsCommands;

use atelier_board::RepoKind;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier - community project board and generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the live board view for a project
    Board {
        /// Project ID to open
        project_id: String,
    },
    /// Browse community projects
    #[command(subcommand)]
    Projects(ProjectsCommands),
    /// Generate a priced task plan from a project description
    Generate {
        /// Project title
        #[arg(short, long)]
        title: Option<String>,
        /// Project description
        #[arg(short, long)]
        description: Option<String>,
        /// Publish to the community board without asking
        #[arg(long)]
        publish: bool,
    },
    /// List tasks awaiting verification review
    Reviews {
        /// Project ID
        project_id: String,
    },
    /// Request to join one of a project's repositories
    Join {
        /// Project ID
        project_id: String,
        /// Repository kind (backend, frontend, contracts)
        repo: RepoKind,
    },
    /// Show subscription status
    Subscription,
}

#[tokio::main]
async fn main() {
    atelier_cli::init_tracing();

    let cli = Cli::parse();

    match handle_command(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let settings = atelier_cli::load_settings()?;

    match command {
        Commands::Board { project_id } => atelier_tui::run(settings, &project_id).await,
        Commands::Projects(projects_cmd) => {
            cli::projects::handle_projects_command(projects_cmd, &settings).await
        }
        Commands::Generate {
            title,
            description,
            publish,
        } => cli::generate::handle_generate(&settings, title, description, publish).await,
        Commands::Reviews { project_id } => {
            cli::projects::handle_reviews(&settings, &project_id).await
        }
        Commands::Join { project_id, repo } => {
            cli::projects::handle_join(&settings, &project_id, repo).await
        }
        Commands::Subscription => cli::billing::show_subscription(&settings).await,
    }
}
