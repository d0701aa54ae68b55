use crate::core::schema::{sheet_name, RUBRICS_ENRICHED_SHEET};
use crate::domain::model::{ConsolidationResult, EventType, OutputFormat};
use crate::domain::table::Table;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 活頁簿中的一張工作表
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// 匯出用的工作表集合，順序即輸出順序
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// 依 S-1010、S-2299、合併表、S-1200 的順序排列
    pub fn from_result(result: &ConsolidationResult) -> Self {
        let mut workbook = Workbook::default();

        for event in [EventType::RateTable, EventType::Termination] {
            workbook.push_event(result, &event);
        }
        if let Some(enriched) = &result.enriched {
            workbook.push(RUBRICS_ENRICHED_SHEET, enriched.clone());
        }
        workbook.push_event(result, &EventType::Compensation);

        workbook
    }

    fn push_event(&mut self, result: &ConsolidationResult, event: &EventType) {
        if let Some(set) = result.tables_for(event) {
            for table in set.iter() {
                self.push(table.name(), table.clone());
            }
        }
    }

    pub fn push(&mut self, name: &str, table: Table) {
        self.sheets.push(Sheet {
            name: sheet_name(name),
            table,
        });
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// 每張工作表以每種格式各寫一個檔案
    pub fn to_zip(&self, formats: &[OutputFormat]) -> Result<Vec<u8>> {
        if formats.is_empty() {
            return Err(EtlError::ValidationError {
                message: "at least one output format is required".to_string(),
            });
        }

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for sheet in &self.sheets {
            for format in formats {
                let file_name = format!("{}.{}", sheet.name, format.extension());
                let content = render(&sheet.table, *format)?;

                zip.start_file::<_, ()>(file_name.as_str(), FileOptions::default())?;
                zip.write_all(&content)?;
            }
        }

        let cursor = zip.finish()?;
        let data = cursor.into_inner();
        tracing::debug!(
            "Workbook rendered: {} sheets x {} formats, {} bytes",
            self.sheets.len(),
            formats.len(),
            data.len()
        );
        Ok(data)
    }
}

pub fn render(table: &Table, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_delimited(table, b','),
        OutputFormat::Tsv => render_delimited(table, b'\t'),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(&table.records())?),
    }
}

fn render_delimited(table: &Table, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::*;
    use crate::domain::table::{TableSet, Value};
    use std::io::Read;

    fn table(name: &str, rows: usize) -> Table {
        let mut table = Table::new(name, [RUBRIC_CODE, AMOUNT, SOURCE_FILE]);
        for i in 0..rows {
            table
                .push_row(vec![
                    Value::text(format!("{}", 1000 + i)),
                    if i % 2 == 0 {
                        Value::Number(1500.5)
                    } else {
                        Value::Missing
                    },
                    Value::text("a, \"b\".xml"),
                ])
                .unwrap();
        }
        table
    }

    fn set(names: &[&str]) -> TableSet {
        let mut set = TableSet::new();
        for name in names {
            set.insert(table(name, 2));
        }
        set
    }

    fn full_result() -> ConsolidationResult {
        ConsolidationResult {
            tables: vec![
                (EventType::Compensation, set(&[HEADER_1200, DECLARATIONS_1200, RUBRICS_1200])),
                (EventType::RateTable, set(&[HEADER_1010, RUBRICS_1010])),
                (EventType::Termination, set(&[HEADER_2299, DECLARATIONS_2299, RUBRICS_2299])),
            ],
            enriched: Some(table(RUBRICS_ENRICHED, 3)),
            ..Default::default()
        }
    }

    fn read_member(data: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_sheet_order() {
        let workbook = Workbook::from_result(&full_result());
        assert_eq!(
            workbook.sheet_names(),
            vec![
                HEADER_1010,
                RUBRICS_1010,
                HEADER_2299,
                DECLARATIONS_2299,
                RUBRICS_2299,
                RUBRICS_ENRICHED_SHEET,
                HEADER_1200,
                DECLARATIONS_1200,
                RUBRICS_1200,
            ]
        );
    }

    #[test]
    fn test_partial_result_has_no_enriched_sheet() {
        let result = ConsolidationResult {
            tables: vec![(EventType::RateTable, set(&[HEADER_1010, RUBRICS_1010]))],
            ..Default::default()
        };
        let workbook = Workbook::from_result(&result);
        assert_eq!(workbook.sheet_names(), vec![HEADER_1010, RUBRICS_1010]);
    }

    #[test]
    fn test_zip_members_per_format() {
        let workbook = Workbook::from_result(&full_result());
        let data = workbook
            .to_zip(&[OutputFormat::Csv, OutputFormat::Json])
            .unwrap();

        let archive = zip::ZipArchive::new(std::io::Cursor::new(data.as_slice())).unwrap();
        assert_eq!(archive.len(), 18);

        let csv = read_member(&data, "RUBRICAS_1200_2299.csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Código Rubrica,Valor Rubrica (R$),Origem Arquivo");
        assert_eq!(lines[1], "1000,1500.5,\"a, \"\"b\"\".xml\"");
        assert_eq!(lines[2], "1001,,\"a, \"\"b\"\".xml\"");
        assert_eq!(lines.len(), 4);

        let json: serde_json::Value =
            serde_json::from_str(&read_member(&data, "CABECALHO_1010.json")).unwrap();
        assert_eq!(json[0][AMOUNT], serde_json::json!(1500.5));
        assert_eq!(json[1][AMOUNT], serde_json::Value::Null);
        assert_eq!(json[1][RUBRIC_CODE], serde_json::json!("1001"));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let tsv = String::from_utf8(render(&table("T", 1), OutputFormat::Tsv).unwrap()).unwrap();
        assert_eq!(
            tsv.lines().next().unwrap(),
            "Código Rubrica\tValor Rubrica (R$)\tOrigem Arquivo"
        );
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut workbook = Workbook::default();
        workbook.push("TABELA_COM_UM_NOME_REALMENTE_MUITO_LONGO", table("x", 0));
        assert_eq!(workbook.sheets()[0].name.chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_no_formats_is_rejected() {
        assert!(Workbook::default().to_zip(&[]).is_err());
    }
}
