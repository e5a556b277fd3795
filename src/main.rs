//! `license-satisfies` — check SPDX license expressions against each other.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging from `-v`.
//! 2. Load config ([`config::load_config`]) and build the range table.
//! 3. Run the subcommand: `satisfies`, `check` or `expand`.
//! 4. Render the result ([`report`] or JSON).
//! 5. Exit `0` when everything is satisfied, `1` otherwise.

mod cli;
mod config;
mod models;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReportFormat};
use config::load_config;
use license_satisfies::{parse, Satisfier};
use models::{CheckResult, ExpandedExpression, Verdict};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;
    let table = config.range_table();
    let satisfier = Satisfier::new(&table).with_max_clauses(config.max_clauses);

    let ok = match &cli.command {
        Command::Satisfies { first, second } => {
            run_satisfies(&satisfier, first, second, &cli.report, cli.quiet)?
        }
        Command::Check {
            policy,
            expressions,
            file,
        } => run_check(
            &satisfier,
            policy,
            expressions,
            file.as_deref(),
            &cli.report,
            cli.quiet,
        )?,
        Command::Expand { expression } => {
            run_expand(&satisfier, expression, &cli.report, cli.quiet)?
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn run_satisfies(
    satisfier: &Satisfier<'_>,
    first: &str,
    second: &str,
    format: &ReportFormat,
    quiet: bool,
) -> Result<bool> {
    let first_expr = parse(first).with_context(|| format!("invalid expression `{}`", first))?;
    let second_expr = parse(second).with_context(|| format!("invalid expression `{}`", second))?;
    let satisfied = satisfier.satisfies_expr(&first_expr, &second_expr);

    match format {
        ReportFormat::Terminal => report::terminal::render_satisfies(first, second, satisfied, quiet),
        ReportFormat::Json => {
            let result = CheckResult {
                expression: first.to_string(),
                policy: second.to_string(),
                verdict: if satisfied {
                    Verdict::Satisfied
                } else {
                    Verdict::Unsatisfied
                },
                error: None,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(satisfied)
}

fn run_check(
    satisfier: &Satisfier<'_>,
    policy: &str,
    expressions: &[String],
    file: Option<&Path>,
    format: &ReportFormat,
    quiet: bool,
) -> Result<bool> {
    let policy_expr = parse(policy).with_context(|| format!("invalid policy `{}`", policy))?;

    let mut all: Vec<String> = expressions.to_vec();
    if let Some(path) = file {
        all.extend(read_expressions(path)?);
    }

    let results: Vec<CheckResult> = all
        .into_iter()
        .map(|expression| match parse(&expression) {
            Ok(expr) => {
                let verdict = if satisfier.satisfies_expr(&expr, &policy_expr) {
                    Verdict::Satisfied
                } else {
                    Verdict::Unsatisfied
                };
                CheckResult {
                    expression,
                    policy: policy.to_string(),
                    verdict,
                    error: None,
                }
            }
            Err(e) => {
                tracing::info!(expression = %expression, error = %e, "skipping unparsable expression");
                CheckResult {
                    expression,
                    policy: policy.to_string(),
                    verdict: Verdict::Invalid,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    match format {
        ReportFormat::Terminal => report::terminal::render_check(&results, policy, quiet),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(results.iter().all(|r| r.verdict == Verdict::Satisfied))
}

fn run_expand(
    satisfier: &Satisfier<'_>,
    expression: &str,
    format: &ReportFormat,
    quiet: bool,
) -> Result<bool> {
    let expanded = expand_expression(satisfier, expression)?;

    match format {
        ReportFormat::Terminal => report::terminal::render_expand(&expanded, quiet),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&expanded)?),
    }

    Ok(true)
}

fn expand_expression(satisfier: &Satisfier<'_>, expression: &str) -> Result<ExpandedExpression> {
    let expr = parse(expression).with_context(|| format!("invalid expression `{}`", expression))?;
    let dnf = satisfier.expand(&expr)?;

    Ok(ExpandedExpression {
        expression: expression.to_string(),
        normalized: license_satisfies::normalize(&expr).to_string(),
        clauses: dnf
            .clauses()
            .iter()
            .map(|c| c.keys().map(str::to_string).collect())
            .collect(),
        max_clauses: satisfier.max_clauses(),
    })
}

/// One expression per non-empty line; `#` starts a comment.
fn read_expressions(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_expressions_skips_comments() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "# dependencies\nMIT\n\n(MIT OR ISC) AND Zlib  # vendored\n   \nGPL-2.0+\n",
        )
        .unwrap();
        let exprs = read_expressions(file.path()).unwrap();
        assert_eq!(exprs, vec!["MIT", "(MIT OR ISC) AND Zlib", "GPL-2.0+"]);
    }

    #[test]
    fn test_run_check_reports_invalid_and_unsatisfied() {
        let satisfier = Satisfier::default();
        let exprs = vec!["MIT".to_string(), "MIT AND".to_string()];
        let ok = run_check(&satisfier, "MIT OR ISC", &exprs, None, &ReportFormat::Json, true).unwrap();
        assert!(!ok);

        let exprs = vec!["MIT".to_string(), "ISC".to_string()];
        let ok = run_check(&satisfier, "MIT OR ISC", &exprs, None, &ReportFormat::Json, true).unwrap();
        assert!(ok);
    }

    #[test]
    fn test_expand_expression_reports_clause_cap() {
        let satisfier = Satisfier::default().with_max_clauses(16);
        let expanded = expand_expression(&satisfier, "(MIT OR ISC) AND GPL-2.0-or-later").unwrap();
        assert_eq!(expanded.normalized, "(MIT OR ISC) AND GPL-2.0+");
        assert_eq!(
            expanded.clauses,
            vec![vec!["GPL-2.0+", "MIT"], vec!["GPL-2.0+", "ISC"]]
        );
        assert_eq!(expanded.max_clauses, 16);

        let json = serde_json::to_value(&expanded).unwrap();
        assert_eq!(json["max_clauses"], 16);

        let capped = Satisfier::default().with_max_clauses(1);
        assert!(expand_expression(&capped, "MIT OR ISC").is_err());
    }

    #[test]
    fn test_run_check_rejects_invalid_policy() {
        let satisfier = Satisfier::default();
        assert!(run_check(&satisfier, "(MIT", &[], None, &ReportFormat::Json, true).is_err());
    }
}
