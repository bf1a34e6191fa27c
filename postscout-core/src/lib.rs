pub mod crawl;
pub mod data;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
                  _                       _
  _ __   ___  ___| |_ ___  ___ ___  _   _| |_
 | '_ \ / _ \/ __| __/ __|/ __/ _ \| | | | __|
 | |_) | (_) \__ \ |_\__ \ (_| (_) | |_| | |_
 | .__/ \___/|___/\__|___/\___\___/ \__,_|\__|
 |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "crawl a site, keep its words".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
