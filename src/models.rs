use chrono::NaiveDate;

/// One spreadsheet cell after reading, before any coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A sheet held in memory: trimmed header names plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the named column; short rows yield `Cell::Empty`.
    pub fn column_cells(&self, name: Option<&str>) -> Vec<Cell> {
        let idx = name.and_then(|n| self.column_index(n));
        self.rows
            .iter()
            .map(|row| match idx {
                Some(i) => row.get(i).cloned().unwrap_or(Cell::Empty),
                None => Cell::Empty,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub code: Option<u64>,
    pub current_limit: Option<f64>,
    pub payment_frequency: Option<f64>,
    pub signup_date: Option<NaiveDate>,
    pub verification_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccountRow {
    pub code: Option<u64>,
    pub signup_date: Option<NaiveDate>,
    pub signup_limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitHistoryRow {
    pub code: Option<u64>,
    pub date: Option<NaiveDate>,
    pub authorized_limit: Option<f64>,
}

/// Earliest qualifying authorization for one account.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitRepresentative {
    pub date: Option<NaiveDate>,
    pub limit: Option<f64>,
}

/// Everything the resolver and classifier need for one account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRow {
    pub code: Option<u64>,
    pub current_limit: Option<f64>,
    pub payment_frequency: Option<f64>,
    pub matrix_signup_date: Option<NaiveDate>,
    pub signup_date: Option<NaiveDate>,
    pub signup_limit: Option<f64>,
    pub limit_date: Option<NaiveDate>,
    pub limit_amount: Option<f64>,
    pub verification_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compliance {
    Compliant,
    NonCompliant,
}

impl Compliance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => "Cumple",
            Self::NonCompliant => "No cumple",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub merged: MergedRow,
    pub reference_date: Option<NaiveDate>,
    pub elapsed_months: Option<i64>,
    pub compliance: Compliance,
}
