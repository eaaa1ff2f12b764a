//! Header resolution and cell coercion.
//!
//! Source sheets come from different exports, so headers drift in casing,
//! accents and punctuation. Every logical field is looked up through an
//! ordered pattern table instead of an exact header name, and every cell is
//! coerced leniently: anything unparseable becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Cell;

// ---------------------------------------------------------------------------
// Header pattern tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Code,
    Limit,
    PaymentFrequency,
    SignupDate,
    VerificationDate,
    HistoryDate,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Limit => "limit",
            Self::PaymentFrequency => "payment_frequency",
            Self::SignupDate => "signup_date",
            Self::VerificationDate => "verification_date",
            Self::HistoryDate => "history_date",
        }
    }
}

/// What to use when no header matches a field's patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Absent,
    FirstColumn,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub patterns: &'static [&'static str],
    pub default: ColumnDefault,
}

const CODE_PATTERNS: &[&str] = &["código", "codigo"];
const LIMIT_PATTERNS: &[&str] = &["límite", "limite"];

pub const MATRIX_FIELDS: &[FieldSpec] = &[
    FieldSpec { field: Field::Code, patterns: CODE_PATTERNS, default: ColumnDefault::FirstColumn },
    FieldSpec {
        field: Field::VerificationDate,
        patterns: &["última verif", "ultima verif", "última", "ultima"],
        default: ColumnDefault::Absent,
    },
    FieldSpec { field: Field::Limit, patterns: LIMIT_PATTERNS, default: ColumnDefault::Absent },
    FieldSpec { field: Field::SignupDate, patterns: &["alta"], default: ColumnDefault::Absent },
    FieldSpec {
        field: Field::PaymentFrequency,
        patterns: &["pago", "frecuencia"],
        default: ColumnDefault::Absent,
    },
];

pub const NEW_ACCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec { field: Field::Code, patterns: CODE_PATTERNS, default: ColumnDefault::Absent },
    FieldSpec {
        field: Field::SignupDate,
        patterns: &["registrado", "alta"],
        default: ColumnDefault::Absent,
    },
    FieldSpec { field: Field::Limit, patterns: LIMIT_PATTERNS, default: ColumnDefault::Absent },
];

pub const LIMIT_HISTORY_FIELDS: &[FieldSpec] = &[
    FieldSpec { field: Field::Code, patterns: CODE_PATTERNS, default: ColumnDefault::Absent },
    FieldSpec {
        field: Field::HistoryDate,
        patterns: &["modified", "historial", "fecha"],
        default: ColumnDefault::Absent,
    },
    FieldSpec { field: Field::Limit, patterns: LIMIT_PATTERNS, default: ColumnDefault::Absent },
];

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// First header, left to right, whose lowercase form contains any pattern.
pub fn resolve_column(
    columns: &[String],
    patterns: &[&str],
    default: Option<&str>,
) -> Option<String> {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            patterns.iter().any(|p| lower.contains(p.as_str()))
        })
        .cloned()
        .or_else(|| default.map(str::to_string))
}

/// Header chosen for each field of `specs`, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns(pub Vec<(Field, Option<String>)>);

impl ResolvedColumns {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, c)| c.as_deref())
    }
}

pub fn resolve_fields(sheet: &str, columns: &[String], specs: &[FieldSpec]) -> ResolvedColumns {
    let resolved = specs
        .iter()
        .map(|spec| {
            let default = match spec.default {
                ColumnDefault::Absent => None,
                ColumnDefault::FirstColumn => columns.first().map(String::as_str),
            };
            let column = resolve_column(columns, spec.patterns, default);
            match &column {
                Some(c) => log::debug!("{sheet}: {} -> '{c}'", spec.field.name()),
                None => log::warn!("{sheet}: no column found for {}", spec.field.name()),
            }
            (spec.field, column)
        })
        .collect();
    ResolvedColumns(resolved)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Digit-only integer form of an account code.
pub fn normalize_code(value: &Cell) -> Option<u64> {
    match value {
        Cell::Empty => None,
        Cell::Number(n) => {
            if n.is_finite() && *n >= 0.0 && *n < u64::MAX as f64 {
                Some(n.trunc() as u64)
            } else {
                None
            }
        }
        Cell::Text(s) => digits_to_code(s),
        Cell::Date(d) => digits_to_code(&d.format("%Y-%m-%d").to_string()),
    }
}

fn digits_to_code(raw: &str) -> Option<u64> {
    let digits: String = raw.trim().chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn coerce_number(value: &Cell) -> Option<f64> {
    match value {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Largest serial Excel can display (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
// Slash dates are day-first; month-first only when the day-first read is impossible.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p", "%I:%M:%S%p", "%I:%M%p"];

pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // Fractional seconds from timestamp exports are dropped.
    let no_fraction = raw.split('.').next().unwrap_or(raw);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(no_fraction, fmt) {
            return Some(dt.date());
        }
    }
    let date_part = strip_time(no_fraction);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Drops a trailing ` HH:MM[:SS]` clock, with optional AM/PM.
fn strip_time(raw: &str) -> &str {
    match raw.split_once(char::is_whitespace) {
        Some((date, clock)) if is_clock(clock.trim()) => date,
        _ => raw,
    }
}

fn is_clock(text: &str) -> bool {
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(text, fmt).is_ok())
}

pub fn coerce_date(value: &Cell) -> Option<NaiveDate> {
    match value {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) => excel_serial_to_date(*n),
        Cell::Text(s) => parse_date_text(s),
        Cell::Empty => None,
    }
}
