use colored::*;
use postscout::commands::command_argument_builder;
use postscout::handlers::*;
use postscout::logging::init_logging;
use postscout_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let db_path = resolve_db_path(
        chosen_command
            .get_one::<String>("db")
            .map(String::as_str)
            .unwrap_or(postscout::commands::DEFAULT_DB_PATH),
    );

    let result = match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command, &db_path),
        Some(("project", primary_command)) => match primary_command.subcommand() {
            Some(("create", secondary_command)) => {
                handle_project_create(secondary_command, &db_path)
            }
            Some(("list", _)) => handle_project_list(&db_path),
            Some(("remove", secondary_command)) => {
                handle_project_remove(secondary_command, &db_path)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("crawl", primary_command)) => handle_crawl(primary_command, &db_path, quiet).await,
        Some(("pages", primary_command)) => match primary_command.subcommand() {
            Some(("list", secondary_command)) => handle_pages_list(secondary_command, &db_path),
            Some(("remove", secondary_command)) => {
                handle_pages_remove(secondary_command, &db_path)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("extra-info", primary_command)) => match primary_command.subcommand() {
            Some(("set", secondary_command)) => {
                handle_extra_info_set(secondary_command, &db_path)
            }
            Some(("show", secondary_command)) => {
                handle_extra_info_show(secondary_command, &db_path)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("description", primary_command)) => match primary_command.subcommand() {
            Some(("set", secondary_command)) => {
                handle_description_set(secondary_command, &db_path)
            }
            Some(("show", secondary_command)) => {
                handle_description_show(secondary_command, &db_path)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("health", _)) => handle_health(&db_path),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
