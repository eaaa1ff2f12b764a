pub mod columns;
pub mod evaluate;
pub mod init;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::{Result, TenureError};

pub(crate) fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| TenureError::InvalidDate(raw.to_string())),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[derive(Parser)]
#[command(
    name = "credit-tenure",
    version,
    about = "Credit tenure and compliance check for account spreadsheets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default settings file.
    Init {
        /// Settings file (default: ~/.config/credit-tenure/settings.json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Compute reference dates, tenure and compliance for every account.
    Evaluate {
        /// Workbook with the Matrix, New-Accounts and Limit-History sheets
        input: PathBuf,
        /// Output file (.xlsx or .csv; default: resultados_<input>.xlsx next to the input)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Processing date, YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
        /// Settings file (default: ~/.config/credit-tenure/settings.json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print every result row
        #[arg(long)]
        show: bool,
    },
    /// Show which header each field resolves to, per sheet.
    Columns {
        /// Workbook to inspect
        input: PathBuf,
        /// Settings file (default: ~/.config/credit-tenure/settings.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
