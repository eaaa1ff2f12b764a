use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::columns::{
    resolve_fields, FieldSpec, LIMIT_HISTORY_FIELDS, MATRIX_FIELDS, NEW_ACCOUNT_FIELDS,
};
use crate::error::Result;
use crate::settings::load_settings;
use crate::workbook::read_sources;

pub fn run(input: &Path, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config);
    let sources = read_sources(input, &settings)?;

    let sheets: [(&str, &[String], &[FieldSpec]); 3] = [
        (settings.matrix_sheet.as_str(), sources.matrix.columns.as_slice(), MATRIX_FIELDS),
        (
            settings.new_accounts_sheet.as_str(),
            sources.new_accounts.columns.as_slice(),
            NEW_ACCOUNT_FIELDS,
        ),
        (
            settings.limit_history_sheet.as_str(),
            sources.limit_history.columns.as_slice(),
            LIMIT_HISTORY_FIELDS,
        ),
    ];

    let mut table = Table::new();
    table.set_header(vec!["Sheet", "Field", "Patterns", "Column"]);
    for (sheet, columns, specs) in sheets {
        let resolved = resolve_fields(sheet, columns, specs);
        for spec in specs {
            let column = match resolved.get(spec.field) {
                Some(c) => c.green().to_string(),
                None => "(none)".red().to_string(),
            };
            table.add_row(vec![
                Cell::new(sheet),
                Cell::new(spec.field.name()),
                Cell::new(spec.patterns.join(" | ")),
                Cell::new(column),
            ]);
        }
    }
    println!("Column resolution for {}\n{table}", input.display());
    Ok(())
}
