use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::models::{Cell, ResultRow};

pub const OUTPUT_COLUMNS: &[&str] = &[
    "codigo_num",
    "limite_actual",
    "pago_frecuencia",
    "fecha_alta_matriz",
    "fecha_alta",
    "limite_alta",
    "fecha_limite",
    "limite_limite",
    "fecha_sap",
    "fecha_base",
    "meses_credito",
    "cumple_final",
];

const SHEET_NAME: &str = "Resultados";

fn number(v: Option<f64>) -> Cell {
    v.map(Cell::Number).unwrap_or(Cell::Empty)
}

fn date(v: Option<NaiveDate>) -> Cell {
    v.map(Cell::Date).unwrap_or(Cell::Empty)
}

/// One output line, in `OUTPUT_COLUMNS` order.
pub fn output_cells(row: &ResultRow) -> Vec<Cell> {
    let m = &row.merged;
    vec![
        number(m.code.map(|c| c as f64)),
        number(m.current_limit),
        number(m.payment_frequency),
        date(m.matrix_signup_date),
        date(m.signup_date),
        number(m.signup_limit),
        date(m.limit_date),
        number(m.limit_amount),
        date(m.verification_date),
        date(row.reference_date),
        number(row.elapsed_months.map(|n| n as f64)),
        Cell::Text(row.compliance.label().to_string()),
    ]
}

fn date_to_excel_serial(d: NaiveDate) -> f64 {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .map(|epoch| (d - epoch).num_days() as f64)
        .unwrap_or_default()
}

pub fn write_xlsx(rows: &[ResultRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
        worksheet.set_column_width(col as u16, 16)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in output_cells(row).iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Date(d) => {
                    worksheet.write_number_with_format(r, c, date_to_excel_serial(*d), &date_format)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn csv_field(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

pub fn write_csv(rows: &[ResultRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        let fields: Vec<String> = output_cells(row).iter().map(csv_field).collect();
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `.csv` paths as CSV, anything else as XLSX.
pub fn write_results(rows: &[ResultRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(rows, path)
    } else {
        write_xlsx(rows, path)
    }
}
