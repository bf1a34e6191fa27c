// Report generation for crawl runs and stored project pages

use crate::crawl::extract_url_path;
use crate::data::{LinkedinDescription, Project, ProjectExtraInfo, ScrapedPage};
use postscout_scanner::{CrawlSummary, PageStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const PREVIEW_CHARS: usize = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Everything stored for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesReportData {
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<ProjectExtraInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LinkedinDescription>,
    pub pages: Vec<ScrapedPage>,
}

pub fn generate_crawl_report(
    summary: &CrawlSummary,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(crawl_text_report(summary)),
        ReportFormat::Json => crawl_json_report(summary),
        ReportFormat::Markdown => Ok(crawl_markdown_report(summary)),
    }
}

pub fn generate_pages_report(
    data: &PagesReportData,
    format: ReportFormat,
    full: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(pages_text_report(data, full)),
        ReportFormat::Json => serde_json::to_string_pretty(data),
        ReportFormat::Markdown => Ok(pages_markdown_report(data, full)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn crawl_text_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                           POSTSCOUT CRAWL REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Project:      {}\n", summary.project_id));
    report.push_str(&format!("Seed:         {}\n", summary.seed_url));
    report.push_str(&format!("Status:       {}\n", run_status(summary)));
    report.push_str(&format!("Visited:      {}\n", summary.visited_count));
    report.push_str(&format!("Stored:       {}\n", summary.created));
    report.push_str(&format!("Failed:       {}\n", summary.failed_count()));
    report.push('\n');

    if !summary.pages.is_empty() {
        report.push_str(RULE);
        report.push_str("PAGES\n");
        report.push_str(RULE);
        report.push('\n');

        for page in &summary.pages {
            let path = extract_url_path(&page.url);
            let line = match page.status {
                PageStatus::Stored => format!(
                    "  ✓ {}  [{} chars, {} links]",
                    path, page.content_chars, page.links_found
                ),
                PageStatus::Empty => format!("  · {}  [no text, {} links]", path, page.links_found),
                PageStatus::FetchFailed | PageStatus::StoreFailed => format!(
                    "  ✗ {}  {}",
                    path,
                    page.error.as_deref().unwrap_or("unknown error")
                ),
            };
            report.push_str(&line);
            report.push('\n');
        }
        report.push('\n');
    }

    report
}

fn crawl_json_report(summary: &CrawlSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Postscout",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "project_id": summary.project_id,
                "seed_url": summary.seed_url,
                "status": run_status(summary).to_lowercase(),
                "created": summary.created,
                "visited": summary.visited_count,
                "failed": summary.failed_count()
            },
            "pages": summary.pages
        }
    });

    serde_json::to_string_pretty(&json_report)
}

fn crawl_markdown_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();

    report.push_str("# Postscout Crawl Report\n\n");
    report.push_str(&format!("- **Project:** `{}`\n", summary.project_id));
    report.push_str(&format!("- **Seed:** <{}>\n", summary.seed_url));
    report.push_str(&format!("- **Status:** {}\n", run_status(summary)));
    report.push_str(&format!(
        "- **Visited / stored / failed:** {} / {} / {}\n\n",
        summary.visited_count,
        summary.created,
        summary.failed_count()
    ));

    if !summary.pages.is_empty() {
        report.push_str("| Path | Status | Chars | Links |\n");
        report.push_str("|------|--------|------:|------:|\n");
        for page in &summary.pages {
            report.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                extract_url_path(&page.url),
                page_status_label(&page.status),
                page.content_chars,
                page.links_found
            ));
        }
        report.push('\n');
    }

    report
}

fn pages_text_report(data: &PagesReportData, full: bool) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str(&format!("PROJECT: {}\n", data.project.name));
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("ID:           {}\n", data.project.id));
    report.push_str(&format!("Created:      {}\n", format_timestamp(data.project.created_at)));
    report.push_str(&format!("Pages:        {}\n", data.pages.len()));
    report.push('\n');

    if let Some(ref description) = data.description {
        report.push_str("LinkedIn description:\n");
        report.push_str(&wrap_text(&description.description_text, 80, "  "));
        report.push('\n');
    }

    if let Some(ref extra) = data.extra_info {
        report.push_str("Extra info:\n");
        report.push_str(&wrap_text(&extra.content, 80, "  "));
        report.push('\n');
    }

    for page in &data.pages {
        report.push_str(&format!("[{}] {}\n", page.id, page.url));
        report.push_str(&format!("     updated {}\n", format_timestamp(page.updated_at)));
        let body = if full {
            page.content.clone()
        } else {
            preview(&page.content, PREVIEW_CHARS)
        };
        report.push_str(&wrap_text(&body, 80, "     "));
        report.push_str("────────────────────────────────────────────────────────────────────────────────\n");
    }

    report
}

fn pages_markdown_report(data: &PagesReportData, full: bool) -> String {
    let mut report = String::new();

    report.push_str(&format!("# {}\n\n", data.project.name));
    report.push_str(&format!("- **ID:** `{}`\n", data.project.id));
    report.push_str(&format!("- **Pages:** {}\n\n", data.pages.len()));

    if let Some(ref description) = data.description {
        report.push_str("## LinkedIn description\n\n");
        report.push_str(&description.description_text);
        report.push_str("\n\n");
    }

    if let Some(ref extra) = data.extra_info {
        report.push_str("## Extra info\n\n");
        report.push_str(&extra.content);
        report.push_str("\n\n");
    }

    report.push_str("## Pages\n\n");
    for page in &data.pages {
        report.push_str(&format!("### {}\n\n", page.url));
        if full {
            report.push_str(&page.content);
        } else {
            report.push_str(&preview(&page.content, PREVIEW_CHARS));
        }
        report.push_str("\n\n");
    }

    report
}

fn run_status(summary: &CrawlSummary) -> &'static str {
    if summary.cancelled { "Cancelled" } else { "Completed" }
}

fn page_status_label(status: &PageStatus) -> &'static str {
    match status {
        PageStatus::Stored => "stored",
        PageStatus::Empty => "empty",
        PageStatus::FetchFailed => "fetch failed",
        PageStatus::StoreFailed => "store failed",
    }
}

pub fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// First `max_chars` characters, cut at a word boundary when possible.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed)
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.chars().count() + word.chars().count() + 1 > width - indent.len()
            && !current_line.is_empty()
        {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
