use crate::core::schema::{
    COMPENSATION_LINE_COLUMNS, PERIOD, RUBRICS_2299_HARMONIZED, TERMINATION_DATE,
};
use crate::domain::table::{Table, Value};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 將 S-2299 明細轉為 S-1200 明細的欄位配置，期間取自離職日期
pub fn harmonize(termination_lines: &Table) -> Result<Table> {
    let date_index = termination_lines
        .column_index(TERMINATION_DATE)
        .ok_or_else(|| {
            EtlError::processing(format!(
                "table '{}' has no '{}' column",
                termination_lines.name(),
                TERMINATION_DATE
            ))
        })?;

    let columns: Vec<&str> = COMPENSATION_LINE_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(TERMINATION_DATE))
        .collect();
    let mapping: Vec<Option<usize>> = columns
        .iter()
        .map(|c| termination_lines.column_index(c))
        .collect();

    let mut out = Table::new(RUBRICS_2299_HARMONIZED, columns.iter().copied());
    for row in termination_lines.rows() {
        let period = period_from_date(&row[date_index]);
        let values = columns
            .iter()
            .zip(&mapping)
            .map(|(column, index)| match (*column, index) {
                (PERIOD, _) => period.clone(),
                (_, Some(i)) => row[*i].clone(),
                (_, None) => Value::Missing,
            })
            .collect();
        out.push_row(values)?;
    }

    tracing::debug!(
        "Harmonized {} termination line items into {}",
        out.len(),
        out.name()
    );
    Ok(out)
}

fn period_from_date(value: &Value) -> Value {
    value
        .as_str()
        .and_then(parse_date)
        .map_or(Value::Missing, |date| {
            Value::Text(date.format("%Y-%m").to_string())
        })
}

/// 支援 `YYYY-MM-DD`、ISO 日期時間、`DD/MM/YYYY` 與 `YYYY-MM`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()
}
