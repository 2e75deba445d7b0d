use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use atelier_api::StudioClient;
use atelier_board::{RepoJoinStatus, RepoKind};
use atelier_config::Settings;

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// List community projects
    List,
    /// Show project details
    Show {
        /// Project ID to show
        id: String,
    },
}

pub async fn handle_projects_command(
    command: ProjectsCommands,
    settings: &Settings,
) -> anyhow::Result<()> {
    let client = StudioClient::new(settings)?;
    match command {
        ProjectsCommands::List => list_projects(&client).await,
        ProjectsCommands::Show { id } => show_project(&client, &id).await,
    }
}

async fn list_projects(client: &StudioClient) -> anyhow::Result<()> {
    let projects = client.projects().await?;

    if projects.is_empty() {
        println!("{}", "No community projects yet".yellow());
        println!(
            "{}",
            "Use 'atelier generate' to publish the first one".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Community Projects".blue().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Title", "Owner", "Repos", "Published"]);

    for project in &projects {
        let repos_text = if project.repos.is_empty() {
            "—".to_string()
        } else {
            project
                .repos
                .iter()
                .map(|r| r.kind.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        table.add_row(vec![
            project.id.clone(),
            truncate(&project.title, 32),
            project.owner_email.clone(),
            repos_text,
            if project.published { "yes" } else { "no" }.to_string(),
        ]);
    }

    println!("{table}");
    println!("Total: {} projects", projects.len().to_string().cyan());

    Ok(())
}

async fn show_project(client: &StudioClient, id: &str) -> anyhow::Result<()> {
    let project = client.project(id).await?;

    println!("{}", format!("Project - {}", project.title).blue().bold());
    println!();
    println!("  {} {}", "ID:".bold(), project.id);
    println!("  {} {}", "Owner:".bold(), project.owner_email);
    if let Some(description) = &project.description {
        println!("  {} {}", "Description:".bold(), description);
    }
    println!(
        "  {} {}",
        "Published:".bold(),
        if project.published { "yes" } else { "no" }
    );

    if !project.repos.is_empty() {
        println!("  {}", "Repositories:".bold());
        for repo in &project.repos {
            let status = client
                .repo_status(id, repo.kind)
                .await
                .map(|r| r.status)
                .unwrap_or_default();
            println!(
                "    {} {} ({})",
                repo.kind.to_string().cyan(),
                repo.url.as_deref().unwrap_or(""),
                membership_text(status)
            );
        }
    }

    println!();
    println!(
        "{}",
        format!("Open the board with 'atelier board {id}'").dimmed()
    );

    Ok(())
}

pub async fn handle_reviews(settings: &Settings, project_id: &str) -> anyhow::Result<()> {
    let client = StudioClient::new(settings)?;
    let pending = client.pending_verifications(project_id).await?;

    if pending.tasks.is_empty() {
        println!("{}", "No tasks awaiting review".green());
        return Ok(());
    }

    println!("{}", "Tasks awaiting review".blue().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Task", "Assignee", "Notes"]);

    for task in &pending.tasks {
        table.add_row(vec![
            truncate(&task.title, 32),
            task.assignee
                .as_ref()
                .map(|a| a.email.clone())
                .unwrap_or_else(|| "—".to_string()),
            truncate(task.notes.as_deref().unwrap_or(""), 48),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        format!("Review them in the board view: 'atelier board {project_id}'").dimmed()
    );

    Ok(())
}

pub async fn handle_join(
    settings: &Settings,
    project_id: &str,
    repo: RepoKind,
) -> anyhow::Result<()> {
    let client = StudioClient::new(settings)?;

    let current = client.repo_status(project_id, repo).await?;
    match current.status {
        RepoJoinStatus::Active => {
            println!(
                "{}",
                format!("You are already a member of the {repo} repository").green()
            );
            return Ok(());
        }
        RepoJoinStatus::Invited => {
            println!(
                "{}",
                format!("An invite for the {repo} repository is already pending").yellow()
            );
            return Ok(());
        }
        RepoJoinStatus::None => {}
    }

    let after = client.request_join(project_id, repo).await?;
    match after.status {
        RepoJoinStatus::Active => println!(
            "{}",
            format!("Joined the {repo} repository, you can now claim its tasks").green()
        ),
        RepoJoinStatus::Invited => println!(
            "{}",
            format!("Invite requested for the {repo} repository, waiting on the owner").yellow()
        ),
        RepoJoinStatus::None => println!("{}", "Join request was not accepted".red()),
    }

    Ok(())
}

fn membership_text(status: RepoJoinStatus) -> &'static str {
    match status {
        RepoJoinStatus::Active => "member",
        RepoJoinStatus::Invited => "invite pending",
        RepoJoinStatus::None => "not a member",
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
