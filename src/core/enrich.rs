use crate::core::schema::{
    INCIDENCE_CP, INCIDENCE_FGTS, INCIDENCE_IRRF, RUBRICS_ENRICHED, RUBRIC_CODE,
    RUBRIC_DESCRIPTION, RUBRIC_NATURE, RUBRIC_TYPE, SOURCE_FILE, VALID_FROM, VALID_UNTIL,
};
use crate::domain::table::{Table, Value};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// 以薪資項目代碼左連接 S-1010 明細
#[derive(Debug, Clone)]
pub struct Enricher {
    pub key: String,
    pub reference_columns: Vec<String>,
    /// 與左表欄位同名時附加的後綴
    pub suffix: String,
}

impl Default for Enricher {
    fn default() -> Self {
        Self {
            key: RUBRIC_CODE.to_string(),
            reference_columns: [
                VALID_FROM,
                VALID_UNTIL,
                RUBRIC_DESCRIPTION,
                RUBRIC_NATURE,
                RUBRIC_TYPE,
                INCIDENCE_CP,
                INCIDENCE_IRRF,
                INCIDENCE_FGTS,
                SOURCE_FILE,
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            suffix: "_1010".to_string(),
        }
    }
}

impl Enricher {
    pub fn enrich(&self, left: &Table, reference: &Table) -> Result<Table> {
        let left_key = key_index(left, &self.key)?;
        let right_key = key_index(reference, &self.key)?;

        // 參考表中不存在的欄位仍輸出，值為 Missing
        let right_indices: Vec<Option<usize>> = self
            .reference_columns
            .iter()
            .map(|c| reference.column_index(c))
            .collect();

        let mut columns: Vec<String> = left.columns().to_vec();
        for column in &self.reference_columns {
            if left.has_column(column) {
                columns.push(format!("{}{}", column, self.suffix));
            } else {
                columns.push(column.clone());
            }
        }

        let mut matches: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in reference.rows().iter().enumerate() {
            if let Some(key) = join_key(&row[right_key]) {
                matches.entry(key).or_default().push(i);
            }
        }

        let mut out = Table::new(RUBRICS_ENRICHED, columns);
        let mut unmatched = 0usize;
        for row in left.rows() {
            let found = join_key(&row[left_key]).and_then(|key| matches.get(&key));
            match found {
                Some(reference_rows) => {
                    for &r in reference_rows {
                        let reference_row = &reference.rows()[r];
                        let mut values = row.clone();
                        values.extend(
                            right_indices
                                .iter()
                                .map(|index| index.map_or(Value::Missing, |i| reference_row[i].clone())),
                        );
                        out.push_row(values)?;
                    }
                }
                None => {
                    unmatched += 1;
                    let mut values = row.clone();
                    values.extend(right_indices.iter().map(|_| Value::Missing));
                    out.push_row(values)?;
                }
            }
        }

        tracing::debug!(
            "Enriched {} line items into {} rows ({} without a rate table match)",
            left.len(),
            out.len(),
            unmatched
        );
        Ok(out)
    }
}

pub fn enrich(left: &Table, reference: &Table) -> Result<Table> {
    Enricher::default().enrich(left, reference)
}

fn key_index(table: &Table, key: &str) -> Result<usize> {
    table.column_index(key).ok_or_else(|| {
        EtlError::processing(format!(
            "table '{}' has no join column '{}'",
            table.name(),
            key
        ))
    })
}

/// Missing 不參與比對
fn join_key(value: &Value) -> Option<String> {
    match value {
        Value::Missing => None,
        other => Some(other.to_string()),
    }
}
