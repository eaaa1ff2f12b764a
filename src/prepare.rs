use crate::columns::{
    coerce_date, coerce_number, normalize_code, resolve_fields, Field, LIMIT_HISTORY_FIELDS,
    MATRIX_FIELDS, NEW_ACCOUNT_FIELDS,
};
use crate::models::{Cell, LimitHistoryRow, MatrixRow, NewAccountRow, Table};

pub fn prepare_matrix(table: &Table) -> Vec<MatrixRow> {
    let cols = resolve_fields("Matrix", &table.columns, MATRIX_FIELDS);
    let codes = table.column_cells(cols.get(Field::Code));
    let limits = table.column_cells(cols.get(Field::Limit));
    let frequencies = table.column_cells(cols.get(Field::PaymentFrequency));
    let signups = table.column_cells(cols.get(Field::SignupDate));
    let verifications = table.column_cells(cols.get(Field::VerificationDate));

    (0..table.rows.len())
        .map(|i| MatrixRow {
            code: normalize_code(&codes[i]),
            current_limit: coerce_number(&limits[i]),
            payment_frequency: coerce_number(&frequencies[i]),
            signup_date: coerce_date(&signups[i]),
            verification_date: coerce_date(&verifications[i]),
        })
        .collect()
}

pub fn prepare_new_accounts(table: &Table) -> Vec<NewAccountRow> {
    let cols = resolve_fields("New-Accounts", &table.columns, NEW_ACCOUNT_FIELDS);
    let codes = table.column_cells(cols.get(Field::Code));
    let dates = table.column_cells(cols.get(Field::SignupDate));
    let limits = table.column_cells(cols.get(Field::Limit));

    (0..table.rows.len())
        .map(|i| NewAccountRow {
            code: normalize_code(&codes[i]),
            signup_date: coerce_date(&dates[i]),
            signup_limit: coerce_number(&limits[i]),
        })
        .collect()
}

/// Continuation rows in the history export leave the code blank, so the raw
/// code column is carried down before it is normalized.
pub fn prepare_limit_history(table: &Table) -> Vec<LimitHistoryRow> {
    let cols = resolve_fields("Limit-History", &table.columns, LIMIT_HISTORY_FIELDS);
    let codes = forward_fill_cells(table.column_cells(cols.get(Field::Code)));
    let dates = table.column_cells(cols.get(Field::HistoryDate));
    let limits = table.column_cells(cols.get(Field::Limit));

    (0..table.rows.len())
        .map(|i| LimitHistoryRow {
            code: normalize_code(&codes[i]),
            date: coerce_date(&dates[i]),
            authorized_limit: coerce_number(&limits[i]),
        })
        .collect()
}

fn forward_fill_cells(cells: Vec<Cell>) -> Vec<Cell> {
    let mut last = Cell::Empty;
    cells
        .into_iter()
        .map(|cell| {
            if cell.is_empty() {
                last.clone()
            } else {
                last = cell.clone();
                cell
            }
        })
        .collect()
}
