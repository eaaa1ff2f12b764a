use chrono::{Datelike, NaiveDate};

use crate::history::reduce_limit_history;
use crate::merge::merge_sources;
use crate::models::{Compliance, MergedRow, ResultRow};
use crate::prepare::{prepare_limit_history, prepare_matrix, prepare_new_accounts};
use crate::settings::Thresholds;
use crate::workbook::SourceTables;

/// Start of the account's credit tenure.
///
/// A signup only counts when it came with a real limit; otherwise the first
/// authorization in the limit history wins, then the matrix verification
/// date, then the matrix signup date.
pub fn resolve_reference_date(row: &MergedRow, min_limit: f64) -> Option<NaiveDate> {
    let fallback = row
        .limit_date
        .or(row.verification_date)
        .or(row.matrix_signup_date);
    match row.signup_date {
        Some(signup) if row.signup_limit.is_some_and(|l| l > min_limit) => Some(signup),
        _ => fallback,
    }
}

/// Whole calendar months from `reference` to `today`, counting a month only
/// once its day-of-month anniversary has been reached.
pub fn elapsed_months(reference: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    let reference = reference?;
    let mut months = (today.year() as i64 - reference.year() as i64) * 12
        + (today.month() as i64 - reference.month() as i64);
    if today.day() < reference.day() {
        months -= 1;
    }
    Some(months)
}

pub fn classify(
    elapsed_months: Option<i64>,
    current_limit: Option<f64>,
    payment_frequency: Option<f64>,
    thresholds: &Thresholds,
) -> Compliance {
    if !elapsed_months.is_some_and(|m| m >= thresholds.min_tenure_months) {
        return Compliance::NonCompliant;
    }
    if !current_limit.is_some_and(|l| l > thresholds.min_limit) {
        return Compliance::NonCompliant;
    }
    if !payment_frequency.is_some_and(|f| f > thresholds.min_payment_frequency) {
        return Compliance::NonCompliant;
    }
    Compliance::Compliant
}

pub fn evaluate_row(row: MergedRow, today: NaiveDate, thresholds: &Thresholds) -> ResultRow {
    let reference_date = resolve_reference_date(&row, thresholds.min_limit);
    let months = elapsed_months(reference_date, today);
    let compliance = classify(months, row.current_limit, row.payment_frequency, thresholds);
    ResultRow {
        merged: row,
        reference_date,
        elapsed_months: months,
        compliance,
    }
}

/// Runs the whole transformation over the three raw sheets.
pub fn evaluate_sources(
    sources: &SourceTables,
    today: NaiveDate,
    thresholds: &Thresholds,
) -> Vec<ResultRow> {
    log::info!("Preparing tables...");
    let matrix = prepare_matrix(&sources.matrix);
    let new_accounts = prepare_new_accounts(&sources.new_accounts);
    let history = prepare_limit_history(&sources.limit_history);

    log::info!("Building result...");
    let reps = reduce_limit_history(&history, thresholds.min_limit);
    let merged = merge_sources(&matrix, &new_accounts, &reps);

    log::info!("Computing months and status (as of {today})...");
    merged
        .into_iter()
        .map(|row| evaluate_row(row, today, thresholds))
        .collect()
}
