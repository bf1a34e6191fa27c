use clap::{arg, command};

pub const DEFAULT_DB_PATH: &str = "~/.config/postscout/postscout.db";

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn project_arg() -> clap::Arg {
    arg!(-p --"project" <PROJECT_ID>)
        .required(true)
        .help("The id of the project (see `postscout project list`)")
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Report format: text, json, markdown")
        .value_parser(["text", "json", "markdown", "md"])
        .default_value("text")
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("postscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("postscout")
        .about("Crawl a project's website and keep its text as context for post ideas")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Show debug logging (RUST_LOG overrides)")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .help("Location of the postscout database")
                .env("POSTSCOUT_DB")
                .default_value(DEFAULT_DB_PATH)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the postscout database on your filesystem")
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite any existing database without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("project")
                .about("Manage projects")
                .subcommand_required(true)
                .subcommand(
                    command!("create").about("Creates a project").arg(
                        arg!(-n --"name" <NAME>)
                            .required(true)
                            .help("The name of the project"),
                    ),
                )
                .subcommand(command!("list").about("List all projects, newest first"))
                .subcommand(
                    command!("remove")
                        .about("Removes a project with all of its pages and notes")
                        .arg(
                            arg!(--"id" <PROJECT_ID>)
                                .required(true)
                                .help("The id of the project"),
                        )
                        .arg(
                            arg!(-y --"yes")
                                .required(false)
                                .help("Do not ask for confirmation"),
                        ),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a website breadth-first on its own hostname and store the text of \
                every page under a project.",
                )
                .arg(project_arg())
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to start crawling from"),
                )
                .arg(
                    arg!(-l --"limit" <PAGES>)
                        .required(false)
                        .help("Maximum number of pages to visit (1-50)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("15"),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Crawl without writing to the database")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(format_arg())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("pages")
                .about("Review the pages stored for a project")
                .subcommand_required(true)
                .subcommand(
                    command!("list")
                        .about("List stored pages, newest first")
                        .arg(project_arg())
                        .arg(
                            arg!(--"full")
                                .required(false)
                                .help("Print the whole text of each page instead of a preview")
                                .action(clap::ArgAction::SetTrue),
                        )
                        .arg(format_arg()),
                )
                .subcommand(
                    command!("remove")
                        .about("Remove one stored page from a project")
                        .arg(project_arg())
                        .arg(
                            arg!(--"id" <PAGE_ID>)
                                .required(true)
                                .help("The id of the page")
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            command!("extra-info")
                .about("Free-text notes kept alongside a project's pages")
                .subcommand_required(true)
                .subcommand(
                    command!("set")
                        .about("Replace the notes of a project")
                        .arg(project_arg())
                        .arg(
                            arg!(-c --"content" <TEXT>)
                                .required(false)
                                .help("The notes, inline")
                                .conflicts_with("file"),
                        )
                        .arg(
                            arg!(--"file" <PATH>)
                                .required(false)
                                .help("Read the notes from a file")
                                .value_parser(clap::value_parser!(std::path::PathBuf))
                                .conflicts_with("content"),
                        ),
                )
                .subcommand(
                    command!("show")
                        .about("Print the notes of a project")
                        .arg(project_arg()),
                ),
        )
        .subcommand(
            command!("description")
                .about("The LinkedIn description kept for a project")
                .subcommand_required(true)
                .subcommand(
                    command!("set")
                        .about("Replace the LinkedIn description of a project")
                        .arg(project_arg())
                        .arg(
                            arg!(-c --"content" <TEXT>)
                                .required(false)
                                .help("The description, inline")
                                .conflicts_with("file"),
                        )
                        .arg(
                            arg!(--"file" <PATH>)
                                .required(false)
                                .help("Read the description from a file")
                                .value_parser(clap::value_parser!(std::path::PathBuf))
                                .conflicts_with("content"),
                        ),
                )
                .subcommand(
                    command!("show")
                        .about("Print the LinkedIn description of a project")
                        .arg(project_arg()),
                ),
        )
        .subcommand(command!("health").about("Check that the database is reachable"))
}
