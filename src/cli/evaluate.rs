use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::parse_as_of;
use crate::error::Result;
use crate::export::write_results;
use crate::fmt;
use crate::models::{Compliance, ResultRow};
use crate::settings::load_settings;
use crate::tenure::evaluate_sources;
use crate::workbook::read_sources;

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub accounts: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub without_reference: usize,
}

pub fn summarize(rows: &[ResultRow]) -> Summary {
    let compliant = rows
        .iter()
        .filter(|r| r.compliance == Compliance::Compliant)
        .count();
    Summary {
        accounts: rows.len(),
        compliant,
        non_compliant: rows.len() - compliant,
        without_reference: rows.iter().filter(|r| r.reference_date.is_none()).count(),
    }
}

fn print_summary(summary: &Summary) {
    let mut table = Table::new();
    table.set_header(vec!["", "Accounts", "%"]);
    table.add_row(vec![
        Cell::new("Cumple".green().bold()),
        Cell::new(summary.compliant),
        Cell::new(fmt::pct(summary.compliant, summary.accounts)),
    ]);
    table.add_row(vec![
        Cell::new("No cumple".red().bold()),
        Cell::new(summary.non_compliant),
        Cell::new(fmt::pct(summary.non_compliant, summary.accounts)),
    ]);
    table.add_row(vec![
        Cell::new("Without reference date"),
        Cell::new(summary.without_reference),
        Cell::new(fmt::pct(summary.without_reference, summary.accounts)),
    ]);
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(summary.accounts),
        Cell::new(""),
    ]);
    println!("Compliance Summary\n{table}");
}

fn print_rows(rows: &[ResultRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Code", "Limit", "Freq", "Signup", "Signup limit", "First auth.", "Verified", "Reference",
        "Months", "Status",
    ]);
    for row in rows {
        let m = &row.merged;
        let status = match row.compliance {
            Compliance::Compliant => row.compliance.label().green().to_string(),
            Compliance::NonCompliant => row.compliance.label().red().to_string(),
        };
        table.add_row(vec![
            Cell::new(fmt::code(m.code)),
            Cell::new(fmt::number(m.current_limit)),
            Cell::new(fmt::number(m.payment_frequency)),
            Cell::new(fmt::date(m.signup_date)),
            Cell::new(fmt::number(m.signup_limit)),
            Cell::new(fmt::date(m.limit_date)),
            Cell::new(fmt::date(m.verification_date)),
            Cell::new(fmt::date(row.reference_date)),
            Cell::new(row.elapsed_months.map(|n| n.to_string()).unwrap_or_default()),
            Cell::new(status),
        ]);
    }
    println!("{table}");
}

pub fn run(
    input: &Path,
    output: Option<PathBuf>,
    as_of: Option<&str>,
    config: Option<&Path>,
    show: bool,
) -> Result<()> {
    let settings = load_settings(config);
    let today = parse_as_of(as_of)?;
    let output = output.unwrap_or_else(|| settings.default_output_path(input));

    log::info!("Reading workbook {}...", input.display());
    let sources = read_sources(input, &settings)?;

    let results = evaluate_sources(&sources, today, &settings.thresholds());

    log::info!("Writing output...");
    write_results(&results, &output)?;

    if show {
        print_rows(&results);
    }
    print_summary(&summarize(&results));
    println!("Output written to {}", output.display());
    Ok(())
}
