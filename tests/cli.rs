use std::path::{Path, PathBuf};

use assert_cmd::Command;
use calamine::{Data, Reader};
use predicates::prelude::*;
use rust_xlsxwriter::{Format, Workbook};

enum V {
    S(&'static str),
    N(f64),
    /// Excel serial with a date number format.
    D(f64),
    E,
}

fn write_sheet(book: &mut Workbook, name: &str, header: &[&str], rows: &[Vec<V>]) {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = book.add_worksheet();
    sheet.set_name(name).unwrap();
    for (c, h) in header.iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, v) in row.iter().enumerate() {
            let c = c as u16;
            match v {
                V::S(s) => {
                    sheet.write_string(r, c, *s).unwrap();
                }
                V::N(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                V::D(n) => {
                    sheet.write_number_with_format(r, c, *n, &date_format).unwrap();
                }
                V::E => {}
            }
        }
    }
}

/// Three accounts: one compliant via signup, one compliant via limit
/// history, one non-compliant on tenure.
fn write_input(dir: &Path, sheets: &[&str]) -> PathBuf {
    let path = dir.join("Cambio_ADN.xlsx");
    let mut book = Workbook::new();
    if sheets.contains(&"Matriz") {
        write_sheet(
            &mut book,
            "Matriz",
            &["Código SAP", "Nombre", "Límite", "PagoFrecuencia", "Fecha alta", "Última verif. ext."],
            &[
                vec![V::S("0101"), V::S("Uno"), V::N(20.0), V::N(3.0), V::S("2020-01-01"), V::E],
                vec![V::S("0102"), V::S("Dos"), V::N(20.0), V::N(4.0), V::S("2020-01-01"), V::E],
                // 2023-12-20
                vec![V::N(103.0), V::S("Tres"), V::N(15.0), V::N(3.0), V::E, V::D(45280.0)],
            ],
        );
    }
    if sheets.contains(&"Alta") {
        write_sheet(
            &mut book,
            "Alta",
            &["Código SAP", "Fecha registrado", "Límite de crédito"],
            &[
                vec![V::S("101"), V::S("2023-06-10"), V::N(10.0)],
                vec![V::S("102"), V::S("01/08/2023"), V::N(1.0)],
            ],
        );
    }
    if sheets.contains(&"Limite") {
        write_sheet(
            &mut book,
            "Limite",
            &["Código SAP", "Modified", "Límite autorizado"],
            &[
                vec![V::S("102"), V::S("2022-06-01"), V::N(1.0)],
                vec![V::E, V::S("2022-07-15"), V::N(8.0)],
                vec![V::E, V::S("2022-08-01"), V::E],
            ],
        );
    }
    book.save(&path).unwrap();
    path
}

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("credit-tenure").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd.env("HOME", dir);
    cmd
}

#[test]
fn test_evaluate_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta", "Limite"]);
    let output = dir.path().join("out.csv");

    cmd(dir.path())
        .args(["evaluate", input.to_str().unwrap(), "--as-of", "2024-03-15", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compliance Summary"));

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "codigo_num,limite_actual,pago_frecuencia,fecha_alta_matriz,fecha_alta,limite_alta,\
         fecha_limite,limite_limite,fecha_sap,fecha_base,meses_credito,cumple_final"
    );
    assert_eq!(lines[1], "101,20,3,2020-01-01,2023-06-10,10,,,,2023-06-10,9,Cumple");
    assert_eq!(
        lines[2],
        "102,20,4,2020-01-01,2023-08-01,1,2022-07-15,8,,2022-07-15,20,Cumple"
    );
    assert_eq!(lines[3], "103,15,3,,,,,,2023-12-20,2023-12-20,2,No cumple");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_evaluate_default_output_is_xlsx_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta", "Limite"]);

    cmd(dir.path())
        .args(["evaluate", input.to_str().unwrap(), "--as-of", "2024-03-15", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cumple"));

    let output = dir.path().join("resultados_Cambio_ADN.xlsx");
    assert!(output.exists());
    let mut book = calamine::open_workbook_auto(&output).unwrap();
    let range = book.worksheet_range("Resultados").unwrap();
    let rows: Vec<&[Data]> = range.rows().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][11], Data::String("cumple_final".into()));
    assert_eq!(rows[1][10], Data::Float(9.0));
    assert_eq!(rows[3][11], Data::String("No cumple".into()));
}

#[test]
fn test_missing_sheet_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta"]);
    let output = dir.path().join("out.csv");

    cmd(dir.path())
        .args(["evaluate", input.to_str().unwrap(), "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing sheet: Limite"));
    assert!(!output.exists());
}

#[test]
fn test_invalid_as_of_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta", "Limite"]);

    cmd(dir.path())
        .args(["evaluate", input.to_str().unwrap(), "--as-of", "ayer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_columns_reports_resolved_headers() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta", "Limite"]);

    cmd(dir.path())
        .args(["columns", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Última verif. ext."))
        .stdout(predicate::str::contains("Fecha registrado"))
        .stdout(predicate::str::contains("Modified"));
}

#[test]
fn test_custom_settings_change_sheet_names_and_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &["Matriz", "Alta", "Limite"]);
    let config = dir.path().join("settings.json");
    std::fs::write(&config, r#"{"min_tenure_months": 12}"#).unwrap();
    let output = dir.path().join("out.csv");

    cmd(dir.path())
        .args(["evaluate", input.to_str().unwrap(), "--as-of", "2024-03-15", "--config"])
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    let labels: Vec<&str> = content
        .lines()
        .skip(1)
        .map(|l| l.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(labels, vec!["No cumple", "Cumple", "No cumple"]);
}

#[test]
fn test_init_writes_settings_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("conf").join("settings.json");

    cmd(dir.path())
        .args(["init", "--config"])
        .arg(&config)
        .assert()
        .success();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written["matrix_sheet"], "Matriz");
    assert_eq!(written["min_tenure_months"], 3);

    cmd(dir.path())
        .args(["init", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cmd(dir.path())
        .args(["init", "--force", "--config"])
        .arg(&config)
        .assert()
        .success();
}
