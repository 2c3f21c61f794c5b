//! Registrar CLI
//!
//! Enrolls a student into a fresh `students` table and prints the id the
//! backend assigned.

use clap::Parser;
use registrar_core::logging_facility::{init_with_level, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "registrar")]
#[command(about = "Registrar - Student enrollment against a relational backend", long_about = None)]
struct Cli {
    #[command(flatten)]
    enroll: commands::enroll::EnrollArgs,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON log lines
    #[arg(long)]
    json: bool,
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn main() {
    let cli = Cli::parse();

    let profile = if cli.json {
        Profile::Production
    } else {
        Profile::Development
    };
    init_with_level(profile, log_level(cli.verbose));

    if let Err(e) = commands::enroll::execute(cli.enroll) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["registrar"]);
        assert_eq!(cli.enroll.db, "sqlite::memory:");
        assert!(!cli.enroll.bulk);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.json);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::parse_from(["registrar", "-vv", "--json"]);
        assert_eq!(log_level(cli.verbose), "debug");
        assert!(cli.json);
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
    }
}
