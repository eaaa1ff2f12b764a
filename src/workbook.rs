use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader};

use crate::columns::{excel_serial_to_date, parse_date_text};
use crate::error::{Result, TenureError};
use crate::models::{Cell, Table};
use crate::settings::Settings;

/// The three raw sheets one evaluation consumes.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub matrix: Table,
    pub new_accounts: Table,
    pub limit_history: Table,
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) => parse_date_text(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// First row is the header; fully blank data rows are dropped.
pub fn table_from_rows<'a, I>(mut rows: I) -> Table
where
    I: Iterator<Item = &'a [Data]>,
{
    let Some(header) = rows.next() else {
        return Table::default();
    };
    let columns = header.iter().map(|h| h.to_string().trim().to_string()).collect();
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();
    Table { columns, rows }
}

type Workbook = calamine::Sheets<BufReader<File>>;

fn read_sheet(workbook: &mut Workbook, sheet: &str) -> Result<Table> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(TenureError::MissingSheet(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;
    let table = table_from_rows(range.rows());
    log::debug!("sheet '{sheet}': {} columns, {} rows", table.columns.len(), table.rows.len());
    Ok(table)
}

pub fn read_sources(path: &Path, settings: &Settings) -> Result<SourceTables> {
    let mut workbook: Workbook = calamine::open_workbook_auto(path)?;
    Ok(SourceTables {
        matrix: read_sheet(&mut workbook, &settings.matrix_sheet)?,
        new_accounts: read_sheet(&mut workbook, &settings.new_accounts_sheet)?,
        limit_history: read_sheet(&mut workbook, &settings.limit_history_sheet)?,
    })
}
