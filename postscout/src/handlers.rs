use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::*;
use postscout_core::crawl::{CrawlOptions, execute_crawl};
use postscout_core::data::{Database, Project};
use postscout_core::report::{
    PagesReportData, ReportFormat, format_timestamp, generate_crawl_report, generate_pages_report,
    save_report,
};
use postscout_scanner::{CrawlSummary, MemoryStore};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Expand `~` and environment variables in a user supplied database path.
pub fn resolve_db_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Open an existing database. Never creates one; that is `postscout init`'s job.
pub fn open_database(path: &Path) -> Result<Database> {
    if !Database::exists(path) {
        bail!(
            "No database found at {}. Run `postscout init` first.",
            path.display()
        );
    }
    Database::new(path).with_context(|| format!("Failed to open database at {}", path.display()))
}

pub fn require_project(db: &Database, project_id: &str) -> Result<Project> {
    db.get_project(project_id)
        .context("Failed to look up project")?
        .ok_or_else(|| anyhow!("Project '{}' does not exist", project_id))
}

pub fn parse_report_format(raw: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(raw).ok_or_else(|| anyhow!("Unknown report format '{}'", raw))
}

/// Notes and descriptions come either inline or from a file, never both.
pub fn read_text_input(content: Option<&String>, file: Option<&PathBuf>) -> Result<String> {
    match (content, file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (Some(_), Some(_)) => bail!("Use either --content or --file, not both"),
        (None, None) => bail!("Provide the text with --content or --file"),
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

fn confirmed(response: &str) -> bool {
    response == "y" || response == "yes"
}

pub fn handle_init(args: &ArgMatches, db_path: &Path) -> Result<()> {
    print_divider();
    println!("{}", "  POSTSCOUT INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let force = args.get_flag("force");
    println!(
        "{} Target: {}",
        "→".blue(),
        db_path.display().to_string().bright_white()
    );
    println!();

    if Database::exists(db_path) {
        if !force {
            println!("{}", "⚠ WARNING".yellow().bold());
            println!("A database already exists:");
            println!(
                "  {} {}",
                "•".yellow(),
                db_path.display().to_string().bright_white()
            );
            println!();
            println!(
                "{}",
                "This operation will delete every project and page in it.".yellow()
            );

            let response = print_prompt("Do you want to continue? [y/N]:")?;
            println!();

            if !confirmed(&response) {
                println!("{} Initialization cancelled.", "✗".red().bold());
                return Ok(());
            }
        }

        Database::drop(db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = db_path.as_os_str().to_owned();
            sidecar.push(suffix);
            let sidecar = PathBuf::from(sidecar);
            if sidecar.exists() {
                fs::remove_file(&sidecar)
                    .with_context(|| format!("Failed to remove {}", sidecar.display()))?;
            }
        }
        println!("{} Removed existing database", "✓".green().bold());
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    Database::new(db_path)
        .with_context(|| format!("Failed to create database at {}", db_path.display()))?;
    println!("{} Created database", "✓".green().bold());
    println!();
    print_divider();
    println!(
        "{} {}",
        "✓".green().bold(),
        "Postscout is ready. Create a project with `postscout project create --name <NAME>`."
            .bright_white()
    );
    print_divider();
    Ok(())
}

pub fn handle_project_create(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let name = args
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("--name is required"))?;

    let project = db
        .create_project(name)
        .context("Failed to create project")?
        .ok_or_else(|| anyhow!("Project name must not be empty"))?;

    println!(
        "{} Created project {} {}",
        "✓".green().bold(),
        project.name.bright_white().bold(),
        format!("({})", project.id).dimmed()
    );
    Ok(())
}

pub fn handle_project_list(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let projects = db.list_projects().context("Failed to list projects")?;

    if projects.is_empty() {
        println!("{} No projects yet.", "•".yellow());
        return Ok(());
    }

    for project in projects {
        let pages = db.count_pages(&project.id).unwrap_or_else(|e| {
            warn!("Failed to count pages for {}: {}", project.id, e);
            0
        });
        println!(
            "{}  {}  {} pages  {}",
            project.id.cyan(),
            project.name.bright_white().bold(),
            pages,
            format_timestamp(project.created_at).dimmed()
        );
    }
    Ok(())
}

pub fn handle_project_remove(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("--id is required"))?;
    let project = require_project(&db, project_id)?;

    if !args.get_flag("yes") {
        let pages = db.count_pages(&project.id).unwrap_or(0);
        println!(
            "{} This removes project {} with {} stored pages and its notes.",
            "⚠".yellow().bold(),
            project.name.bright_white().bold(),
            pages
        );
        let response = print_prompt("Do you want to continue? [y/N]:")?;
        if !confirmed(&response) {
            println!("{} Nothing removed.", "✗".red().bold());
            return Ok(());
        }
    }

    db.delete_project(&project.id)
        .context("Failed to remove project")?;
    println!(
        "{} Removed project {}",
        "✓".green().bold(),
        project.name.bright_white().bold()
    );
    Ok(())
}

/// Sets `flag` once Ctrl-C arrives. The crawl notices before its next fetch.
fn spawn_cancel_listener(flag: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "\n{} Stopping after the current page...",
                "⚠".yellow().bold()
            );
            flag.store(true, Ordering::SeqCst);
        }
    });
}

pub async fn handle_crawl(args: &ArgMatches, db_path: &Path, quiet: bool) -> Result<()> {
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let format = parse_report_format(
        args.get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let output = args.get_one::<PathBuf>("output");
    let dry_run = args.get_flag("dry-run");

    let mut options = CrawlOptions::new(url.clone(), project_id.clone());
    if let Some(limit) = args.get_one::<usize>("limit") {
        options.page_limit = *limit;
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    options.show_progress_bars = !quiet;

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_cancel_listener(cancel.clone());

    let summary: CrawlSummary = if dry_run {
        debug!("Dry run: pages are kept in memory only");
        let store = MemoryStore::new();
        execute_crawl(&options, &store, Some(cancel)).await?
    } else {
        let db = open_database(db_path)?;
        require_project(&db, project_id)?;
        execute_crawl(&options, &db, Some(cancel)).await?
    };

    let report = generate_crawl_report(&summary, format)?;
    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => println!("{}", report),
    }

    if !quiet {
        eprintln!(
            "{} Visited {} pages, stored {}{}",
            if summary.cancelled {
                "⚠".yellow().bold()
            } else {
                "✓".green().bold()
            },
            summary.visited_count,
            summary.created,
            if dry_run { " (dry run)" } else { "" }
        );
    }
    Ok(())
}

pub fn handle_pages_list(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let format = parse_report_format(
        args.get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let full = args.get_flag("full");

    let project = require_project(&db, project_id)?;
    let data = PagesReportData {
        extra_info: db
            .get_extra_info(&project.id)
            .context("Failed to load notes")?,
        description: db
            .get_description(&project.id)
            .context("Failed to load description")?,
        pages: db.list_pages(&project.id).context("Failed to list pages")?,
        project,
    };

    println!("{}", generate_pages_report(&data, format, full)?);
    Ok(())
}

pub fn handle_pages_remove(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let page_id = *args
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("--id is required"))?;

    if !db
        .delete_page(page_id, project_id)
        .context("Failed to remove page")?
    {
        bail!("Page {} does not belong to project '{}'", page_id, project_id);
    }
    println!("{} Removed page {}", "✓".green().bold(), page_id);
    Ok(())
}

pub fn handle_extra_info_set(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let content = read_text_input(
        args.get_one::<String>("content"),
        args.get_one::<PathBuf>("file"),
    )?;

    let project = require_project(&db, project_id)?;
    let info = db
        .upsert_extra_info(&project.id, &content)
        .context("Failed to save notes")?;
    println!(
        "{} Saved {} characters of notes for {}",
        "✓".green().bold(),
        info.content.chars().count(),
        project.name.bright_white().bold()
    );
    Ok(())
}

pub fn handle_extra_info_show(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let project = require_project(&db, project_id)?;

    match db
        .get_extra_info(&project.id)
        .context("Failed to load notes")?
    {
        Some(info) => println!("{}", info.content),
        None => println!("{} No notes for {}.", "•".yellow(), project.name),
    }
    Ok(())
}

pub fn handle_description_set(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let text = read_text_input(
        args.get_one::<String>("content"),
        args.get_one::<PathBuf>("file"),
    )?;

    let project = require_project(&db, project_id)?;
    let description = db
        .upsert_description(&project.id, &text)
        .context("Failed to save description")?;
    println!(
        "{} Saved LinkedIn description ({} characters) for {}",
        "✓".green().bold(),
        description.description_text.chars().count(),
        project.name.bright_white().bold()
    );
    Ok(())
}

pub fn handle_description_show(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let project_id = args
        .get_one::<String>("project")
        .ok_or_else(|| anyhow!("--project is required"))?;
    let project = require_project(&db, project_id)?;

    match db
        .get_description(&project.id)
        .context("Failed to load description")?
    {
        Some(description) => println!("{}", description.description_text),
        None => println!("{} No LinkedIn description for {}.", "•".yellow(), project.name),
    }
    Ok(())
}

pub fn handle_health(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    db.health_check().context("Database health check failed")?;
    println!(
        "{} Database OK: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    Ok(())
}
