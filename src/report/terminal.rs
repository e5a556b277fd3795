use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{CheckResult, ExpandedExpression, Verdict};

/// Print the verdict of a single `satisfies` check.
pub fn render_satisfies(first: &str, second: &str, satisfied: bool, quiet: bool) {
    if quiet {
        println!("{}", satisfied);
        return;
    }

    let verdict = if satisfied {
        "✓ satisfied".green().bold()
    } else {
        "✗ not satisfied".red().bold()
    };
    println!(" {}  {}  by  {}", verdict, first.bold(), second.bold());
}

/// Render the results of a `check` run: summary box, then a table of failures
/// (or of everything when not quiet).
pub fn render_check(results: &[CheckResult], policy: &str, quiet: bool) {
    let total = results.len();
    let satisfied = count(results, &Verdict::Satisfied);
    let unsatisfied = count(results, &Verdict::Unsatisfied);
    let invalid = count(results, &Verdict::Invalid);

    if quiet {
        println!(
            "Total: {}  Satisfied: {}  Unsatisfied: {}  Invalid: {}",
            total,
            satisfied.to_string().green(),
            unsatisfied.to_string().red(),
            invalid.to_string().yellow(),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "license-satisfies".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Policy: {}\n", policy);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total expressions : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Satisfied      : {:>4}", "✓".green(), satisfied)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unsatisfied    : {:>4}", "✗".red(), unsatisfied)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Invalid        : {:>4}", "⚠".yellow(), invalid)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if total > 0 {
        render_table(results);
        println!();
    }
}

fn render_table(results: &[CheckResult]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Expression").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
            Cell::new("Detail").add_attribute(Attribute::Bold),
        ]);

    for result in results {
        let (verdict_str, verdict_color) = match result.verdict {
            Verdict::Satisfied => ("✓ satisfied", Color::Green),
            Verdict::Unsatisfied => ("✗ unsatisfied", Color::Red),
            Verdict::Invalid => ("⚠ invalid", Color::Yellow),
        };

        table.add_row(vec![
            Cell::new(&result.expression),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(result.error.as_deref().unwrap_or("")),
        ]);
    }

    println!("{}", table);
}

/// Print an expression's normalized form and its DNF clauses, one per line.
pub fn render_expand(expanded: &ExpandedExpression, quiet: bool) {
    if !quiet {
        println!(" {} {}", "Expression:".bold(), expanded.expression);
        println!(" {} {}", "Normalized:".bold(), expanded.normalized);
        println!(
            " {} {} (cap {})\n",
            "Clauses:".bold(),
            expanded.clauses.len(),
            expanded.max_clauses
        );
    }
    for clause in &expanded.clauses {
        println!("{}", clause.join(" AND "));
    }
}

fn count(results: &[CheckResult], verdict: &Verdict) -> usize {
    results.iter().filter(|r| &r.verdict == verdict).count()
}
