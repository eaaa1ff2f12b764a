use chrono::NaiveDate;

/// Plain number for console tables: integers without decimals, blank when absent.
pub fn number(val: Option<f64>) -> String {
    match val {
        None => String::new(),
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => format!("{n:.2}"),
    }
}

pub fn date(val: Option<NaiveDate>) -> String {
    val.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn code(val: Option<u64>) -> String {
    val.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Share of `part` in `total` as "12.5%"; "0.0%" for an empty total.
pub fn pct(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}
