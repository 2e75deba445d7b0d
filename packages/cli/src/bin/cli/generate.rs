use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use inquire::{Confirm, Text};

use atelier_api::{
    ApiError, GenerateTasksRequest, GenerateTasksResponse, ProjectCreateRequest, StudioClient, Tier,
};
use atelier_cli::draft::{self, GeneratorDraft};
use atelier_config::Settings;

/// The generator flow: gate on the subscription, split the description
/// into priced tasks, then optionally publish the plan as a community
/// project. The form is drafted to disk before any checkout detour.
pub async fn handle_generate(
    settings: &Settings,
    title: Option<String>,
    description: Option<String>,
    publish: bool,
) -> anyhow::Result<()> {
    let client = StudioClient::new(settings)?;
    let draft_path = draft::default_path()?;

    let (title, description) = collect_form(title, description, &draft_path)?;

    let status = client.subscription_status().await?;
    if !status.allows_generator() {
        return start_checkout(&client, &draft_path, &title, &description).await;
    }

    println!("{}", "Generating task plan...".dimmed());
    let request = GenerateTasksRequest {
        title: title.clone(),
        description: description.clone(),
    };
    let plan = match client.generate_tasks(&request).await {
        Ok(plan) => plan,
        // The subscription can lapse between the status check and the
        // call itself; same detour, same draft.
        Err(ApiError::SubscriptionRequired(_)) => {
            return start_checkout(&client, &draft_path, &title, &description).await;
        }
        Err(e) => return Err(e.into()),
    };

    if plan.tasks.is_empty() {
        println!("{}", "The generator produced no tasks".yellow());
        return Ok(());
    }

    print_plan(&title, &plan);

    let publish = publish
        || Confirm::new("Publish this plan to the community board?")
            .with_default(false)
            .prompt()?;
    if !publish {
        println!("{}", "Plan discarded, your draft is kept".dimmed());
        return Ok(());
    }

    let project = client
        .create_project(&ProjectCreateRequest {
            title,
            description,
            tasks: plan.tasks,
            publish: true,
        })
        .await?;
    draft::clear(&draft_path)?;

    println!();
    println!(
        "{}",
        format!("Published project {}", project.id).green().bold()
    );
    println!(
        "{}",
        format!("Open the board with 'atelier board {}'", project.id).dimmed()
    );

    Ok(())
}

/// Resolve the form from flags, a saved draft, or interactive prompts.
fn collect_form(
    title: Option<String>,
    description: Option<String>,
    draft_path: &std::path::Path,
) -> anyhow::Result<(String, String)> {
    if let (Some(title), Some(description)) = (&title, &description) {
        return Ok((title.clone(), description.clone()));
    }

    if title.is_none() && description.is_none() {
        if let Some(saved) = draft::load(draft_path)? {
            let resume = Confirm::new(&format!(
                "Resume your saved draft \"{}\" from {}?",
                saved.title,
                saved.saved_at.format("%Y-%m-%d %H:%M")
            ))
            .with_default(true)
            .prompt()?;
            if resume {
                return Ok((saved.title, saved.description));
            }
            draft::clear(draft_path)?;
        }
    }

    let title = match title {
        Some(t) => t,
        None => Text::new("Project title:").prompt()?,
    };
    let description = match description {
        Some(d) => d,
        None => Text::new("Describe the project:").prompt()?,
    };
    Ok((title, description))
}

async fn start_checkout(
    client: &StudioClient,
    draft_path: &std::path::Path,
    title: &str,
    description: &str,
) -> anyhow::Result<()> {
    draft::save(draft_path, &GeneratorDraft::new(title, description))?;

    println!(
        "{}",
        "The generator needs an active Studio subscription".yellow()
    );
    println!(
        "{}",
        "Your form is saved and will be offered again after checkout".dimmed()
    );

    let session = client.create_checkout_session(Tier::Studio).await?;
    println!();
    println!("Complete checkout here: {}", session.url.cyan().underline());
    println!(
        "{}",
        "Then run 'atelier generate' again to resume".dimmed()
    );

    Ok(())
}

fn print_plan(title: &str, plan: &GenerateTasksResponse) {
    println!();
    println!("{}", format!("Task plan for \"{title}\"").blue().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Task", "Repo", "Priority", "Price"]);

    for task in &plan.tasks {
        table.add_row(vec![
            task.title.clone(),
            task.repo.map(|r| r.to_string()).unwrap_or_default(),
            task.priority.to_string(),
            format!("${:.2}", task.price),
        ]);
    }

    println!("{table}");

    let total = plan
        .total_price
        .unwrap_or_else(|| plan.tasks.iter().map(|t| t.price).sum());
    println!(
        "Total: {} across {} tasks",
        format!("${total:.2}").green().bold(),
        plan.tasks.len()
    );
}
