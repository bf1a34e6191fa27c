use postscout::commands::command_argument_builder;
use postscout::handlers::*;
use postscout_core::data::Database;
use postscout_core::report::ReportFormat;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn sub_matches(argv: &[&str]) -> clap::ArgMatches {
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .expect("arguments should parse");
    let mut current = matches;
    while let Some((_, next)) = current.subcommand() {
        current = next.clone();
    }
    current
}

fn seeded_db() -> (TempDir, PathBuf, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("postscout.db");
    let db = Database::new(&path).unwrap();
    let project = db.create_project("Acme").unwrap().unwrap();
    (dir, path, project.id)
}

#[test]
fn test_resolve_db_path_expands_tilde() {
    let resolved = resolve_db_path("~/postscout.db");
    assert!(!resolved.to_string_lossy().starts_with('~'));
    assert!(resolved.ends_with("postscout.db"));
}

#[test]
fn test_resolve_db_path_keeps_plain_paths() {
    assert_eq!(
        resolve_db_path("/tmp/postscout.db"),
        PathBuf::from("/tmp/postscout.db")
    );
}

#[test]
fn test_open_database_requires_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.db");

    let err = open_database(&path).err().unwrap();
    assert!(err.to_string().contains("postscout init"));
    assert!(!path.exists());
}

#[test]
fn test_require_project() {
    let (_dir, path, project_id) = seeded_db();
    let db = open_database(&path).unwrap();

    assert_eq!(require_project(&db, &project_id).unwrap().name, "Acme");
    assert!(require_project(&db, "nope").is_err());
}

#[test]
fn test_parse_report_format() {
    assert_eq!(parse_report_format("json").unwrap(), ReportFormat::Json);
    assert_eq!(parse_report_format("md").unwrap(), ReportFormat::Markdown);
    assert!(parse_report_format("pdf").is_err());
}

#[test]
fn test_read_text_input_inline() {
    let text = "Tone: friendly".to_string();
    assert_eq!(read_text_input(Some(&text), None).unwrap(), text);
}

#[test]
fn test_read_text_input_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "Audience: cyclists")?;
    let path = file.path().to_path_buf();

    assert_eq!(read_text_input(None, Some(&path))?, "Audience: cyclists");
    Ok(())
}

#[test]
fn test_read_text_input_needs_exactly_one_source() {
    let text = "x".to_string();
    let path = PathBuf::from("notes.txt");
    assert!(read_text_input(None, None).is_err());
    assert!(read_text_input(Some(&text), Some(&path)).is_err());
    assert!(read_text_input(None, Some(&PathBuf::from("/definitely/not/here"))).is_err());
}

#[test]
fn test_handle_init_force_creates_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("postscout.db");

    let args = sub_matches(&["postscout", "init", "--force"]);
    handle_init(&args, &path).unwrap();

    assert!(path.exists());
    assert!(Database::new(&path).unwrap().health_check().is_ok());
}

#[test]
fn test_handle_init_force_replaces_existing_database() {
    let (_dir, path, project_id) = seeded_db();

    let args = sub_matches(&["postscout", "init", "--force"]);
    handle_init(&args, &path).unwrap();

    let db = Database::new(&path).unwrap();
    assert!(db.get_project(&project_id).unwrap().is_none());
}

#[test]
fn test_handle_project_create_rejects_blank_name() {
    let (_dir, path, _) = seeded_db();

    let args = sub_matches(&["postscout", "project", "create", "--name", "   "]);
    assert!(handle_project_create(&args, &path).is_err());

    let args = sub_matches(&["postscout", "project", "create", "--name", "Bikes"]);
    handle_project_create(&args, &path).unwrap();
    assert_eq!(Database::new(&path).unwrap().list_projects().unwrap().len(), 2);
}

#[test]
fn test_handle_project_remove_with_yes() {
    let (_dir, path, project_id) = seeded_db();
    Database::new(&path)
        .unwrap()
        .upsert_page("https://ex.com/", &project_id, "Home")
        .unwrap();

    let args = sub_matches(&["postscout", "project", "remove", "--id", &project_id, "--yes"]);
    handle_project_remove(&args, &path).unwrap();

    let db = Database::new(&path).unwrap();
    assert!(db.get_project(&project_id).unwrap().is_none());
    assert_eq!(db.count_pages(&project_id).unwrap(), 0);
}

#[test]
fn test_handle_pages_remove_checks_project() {
    let (_dir, path, project_id) = seeded_db();
    let db = Database::new(&path).unwrap();
    db.upsert_page("https://ex.com/", &project_id, "Home").unwrap();
    let page_id = db.list_pages(&project_id).unwrap()[0].id.to_string();

    let args = sub_matches(&["postscout", "pages", "remove", "-p", "other", "--id", &page_id]);
    assert!(handle_pages_remove(&args, &path).is_err());
    assert_eq!(db.count_pages(&project_id).unwrap(), 1);

    let args = sub_matches(&["postscout", "pages", "remove", "-p", &project_id, "--id", &page_id]);
    handle_pages_remove(&args, &path).unwrap();
    assert_eq!(db.count_pages(&project_id).unwrap(), 0);
}

#[test]
fn test_handle_extra_info_set_and_show() {
    let (_dir, path, project_id) = seeded_db();

    let args = sub_matches(&[
        "postscout", "extra-info", "set", "-p", &project_id, "-c", "Tone: upbeat",
    ]);
    handle_extra_info_set(&args, &path).unwrap();

    let db = Database::new(&path).unwrap();
    assert_eq!(
        db.get_extra_info(&project_id).unwrap().unwrap().content,
        "Tone: upbeat"
    );

    let args = sub_matches(&["postscout", "extra-info", "show", "-p", &project_id]);
    handle_extra_info_show(&args, &path).unwrap();
}

#[test]
fn test_handle_extra_info_set_unknown_project() {
    let (_dir, path, _) = seeded_db();

    let args = sub_matches(&["postscout", "extra-info", "set", "-p", "nope", "-c", "x"]);
    assert!(handle_extra_info_set(&args, &path).is_err());
}

#[test]
fn test_handle_description_set_from_file_and_show() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path, project_id) = seeded_db();
    let mut file = NamedTempFile::new()?;
    write!(file, "Bikes built to last")?;
    let file_path = file.path().to_string_lossy().to_string();

    let args = sub_matches(&[
        "postscout", "description", "set", "-p", &project_id, "--file", &file_path,
    ]);
    handle_description_set(&args, &path)?;

    let db = Database::new(&path)?;
    let description = db.get_description(&project_id)?.unwrap();
    assert_eq!(description.description_text, "Bikes built to last");
    assert!(db.get_extra_info(&project_id)?.is_none());

    let args = sub_matches(&["postscout", "description", "show", "-p", &project_id]);
    handle_description_show(&args, &path)?;
    Ok(())
}

#[test]
fn test_handle_description_set_replaces_previous_text() {
    let (_dir, path, project_id) = seeded_db();

    for text in ["First draft", "Final draft"] {
        let args = sub_matches(&["postscout", "description", "set", "-p", &project_id, "-c", text]);
        handle_description_set(&args, &path).unwrap();
    }

    let db = Database::new(&path).unwrap();
    assert_eq!(
        db.get_description(&project_id).unwrap().unwrap().description_text,
        "Final draft"
    );
}

#[test]
fn test_handle_description_unknown_project() {
    let (_dir, path, _) = seeded_db();

    let args = sub_matches(&["postscout", "description", "set", "-p", "nope", "-c", "x"]);
    assert!(handle_description_set(&args, &path).is_err());

    let args = sub_matches(&["postscout", "description", "show", "-p", "nope"]);
    assert!(handle_description_show(&args, &path).is_err());
}

#[test]
fn test_handle_pages_list() {
    let (_dir, path, project_id) = seeded_db();
    Database::new(&path)
        .unwrap()
        .upsert_page("https://ex.com/", &project_id, "Home")
        .unwrap();

    let args = sub_matches(&["postscout", "pages", "list", "-p", &project_id, "-f", "json"]);
    handle_pages_list(&args, &path).unwrap();

    let args = sub_matches(&["postscout", "pages", "list", "-p", "nope"]);
    assert!(handle_pages_list(&args, &path).is_err());
}

#[test]
fn test_handle_health() {
    let (_dir, path, _) = seeded_db();
    handle_health(&path).unwrap();

    let missing = path.with_file_name("missing.db");
    assert!(handle_health(&missing).is_err());
}

#[tokio::test]
async fn test_handle_crawl_requires_existing_project() {
    let (_dir, path, _) = seeded_db();

    let args = sub_matches(&[
        "postscout", "crawl", "-p", "nope", "-u", "http://127.0.0.1:9/",
    ]);
    let err = handle_crawl(&args, &path, true).await.err().unwrap();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_handle_crawl_rejects_invalid_seed() {
    let (_dir, path, project_id) = seeded_db();

    let args = sub_matches(&["postscout", "crawl", "-p", &project_id, "-u", "not a url"]);
    assert!(handle_crawl(&args, &path, true).await.is_err());
}

async fn two_page_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(
                    "<html><body><h1>Acme</h1>\n<a href=\"/about\">About</a></body></html>"
                        .as_bytes(),
                ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes("<html><body><p>Since 1999</p></body></html>".as_bytes()),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_handle_crawl_dry_run_writes_report_only() {
    let server = two_page_site().await;
    let (dir, path, project_id) = seeded_db();
    let report_path = dir.path().join("crawl.json");
    let seed = format!("{}/", server.uri());
    let report_arg = report_path.to_string_lossy().to_string();

    let args = sub_matches(&[
        "postscout", "crawl", "-p", &project_id, "-u", &seed, "--dry-run", "-f", "json", "-o",
        &report_arg,
    ]);
    handle_crawl(&args, &path, true).await.unwrap();

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("\"created\": 2"));
    assert!(report.contains("\"visited\": 2"));
    assert!(report.contains(&seed));

    let db = Database::new(&path).unwrap();
    assert_eq!(db.count_pages(&project_id).unwrap(), 0);
}

#[tokio::test]
async fn test_handle_crawl_dry_run_skips_project_check() {
    let server = two_page_site().await;
    let dir = TempDir::new().unwrap();
    let missing_db = dir.path().join("never-created.db");
    let seed = format!("{}/", server.uri());

    let args = sub_matches(&["postscout", "crawl", "-p", "any", "-u", &seed, "--dry-run"]);
    handle_crawl(&args, &missing_db, true).await.unwrap();

    assert!(!missing_db.exists());
}

#[tokio::test]
async fn test_handle_crawl_stores_pages() {
    let server = two_page_site().await;
    let (_dir, path, project_id) = seeded_db();
    let seed = format!("{}/", server.uri());

    let args = sub_matches(&["postscout", "crawl", "-p", &project_id, "-u", &seed]);
    handle_crawl(&args, &path, true).await.unwrap();

    let db = Database::new(&path).unwrap();
    assert_eq!(db.count_pages(&project_id).unwrap(), 2);
    assert_eq!(
        db.get_page(&seed, &project_id).unwrap().unwrap().content,
        "Acme About"
    );
}
