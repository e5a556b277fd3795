use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "license-satisfies",
    about = "Check whether one SPDX license expression is satisfied by another",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.license-satisfies/config.toml, fallback ~/.config/license-satisfies/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT", global = true)]
    pub report: ReportFormat,

    /// Log verbosity; repeat for more (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print the verdict or summary line
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether FIRST is satisfied by SECOND
    Satisfies {
        /// Expression whose terms must be met, e.g. "GPL-2.0-or-later"
        first: String,
        /// Expression offered to meet them, e.g. "GPL-3.0"
        second: String,
    },

    /// Check several expressions against one policy expression
    Check {
        /// Policy expression every checked expression must be satisfied by
        #[arg(long)]
        policy: String,

        /// Expressions to check
        expressions: Vec<String>,

        /// Read further expressions from a file, one per line (`#` starts a comment)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the normalized disjunctive normal form of an expression
    Expand {
        expression: String,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_satisfies() {
        let cli = Cli::parse_from(["license-satisfies", "satisfies", "MIT", "MIT OR ISC"]);
        match cli.command {
            Command::Satisfies { first, second } => {
                assert_eq!(first, "MIT");
                assert_eq!(second, "MIT OR ISC");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "license-satisfies",
            "check",
            "--policy",
            "MIT",
            "ISC",
            "-vv",
            "--report",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(matches!(cli.command, Command::Check { ref expressions, .. } if expressions == &["ISC"]));
    }
}
