use crate::domain::table::{Table, TableSet};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RATE_TABLE_CODE: &str = "S-1010";
pub const COMPENSATION_CODE: &str = "S-1200";
pub const TERMINATION_CODE: &str = "S-2299";

/// 文件的事件類型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// S-1010 薪資項目表
    RateTable,
    /// S-1200 勞工薪酬
    Compensation,
    /// S-2299 離職
    Termination,
    /// 由 Id 屬性推得的其他事件代碼，如 `S-2200`
    Other(String),
    Unknown,
}

impl EventType {
    pub const SUPPORTED: [EventType; 3] = [
        EventType::RateTable,
        EventType::Compensation,
        EventType::Termination,
    ];

    pub fn code(&self) -> &str {
        match self {
            EventType::RateTable => RATE_TABLE_CODE,
            EventType::Compensation => COMPENSATION_CODE,
            EventType::Termination => TERMINATION_CODE,
            EventType::Other(code) => code,
            EventType::Unknown => "UNKNOWN",
        }
    }

    /// 兩個類型代表同一事件代碼時視為相符
    pub fn matches(&self, other: &EventType) -> bool {
        self.code() == other.code()
    }

    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            EventType::RateTable | EventType::Compensation | EventType::Termination
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 上傳的原始文件，只讀一次
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// 送入某個事件步驟的文件
#[derive(Debug, Clone)]
pub struct Upload {
    pub expected: EventType,
    pub document: RawDocument,
}

/// 讀取階段的產出：可處理的文件與讀取失敗的訊息
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub uploads: Vec<Upload>,
    pub notices: Vec<Notice>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "tsv" => Some(OutputFormat::Tsv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// 批次處理過程中回報給呼叫端的訊息
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// 事件類型與步驟不符，檔案略過
    Skipped {
        file: String,
        expected: String,
        found: String,
    },
    /// 文件解析失敗，檔案略過
    Failed { file: String, message: String },
    /// 缺少某些事件類型，無法產生合併表
    Incomplete { missing: Vec<String> },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Skipped {
                file,
                expected,
                found,
            } => write!(
                f,
                "{}: event {} is not supported in the {} step; file skipped",
                file, found, expected
            ),
            Notice::Failed { file, message } => write!(f, "Failed to process {}: {}", file, message),
            Notice::Incomplete { missing } => write!(
                f,
                "Provide valid {} documents to build the consolidated line items",
                missing.join(", ")
            ),
        }
    }
}

/// 整批處理的結果
#[derive(Debug, Clone, Default)]
pub struct ConsolidationResult {
    pub tables: Vec<(EventType, TableSet)>,
    pub enriched: Option<Table>,
    pub notices: Vec<Notice>,
    pub documents_read: usize,
    pub documents_parsed: usize,
}

impl ConsolidationResult {
    pub fn tables_for(&self, event: &EventType) -> Option<&TableSet> {
        self.tables
            .iter()
            .find(|(e, _)| e == event)
            .map(|(_, set)| set)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_codes() {
        assert_eq!(EventType::RateTable.code(), "S-1010");
        assert_eq!(EventType::Compensation.to_string(), "S-1200");
        assert_eq!(EventType::Unknown.code(), "UNKNOWN");
        assert!(EventType::Other("S-2299".to_string()).matches(&EventType::Termination));
        assert!(!EventType::Other("S-2299".to_string()).is_supported());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse(" TSV "), Some(OutputFormat::Tsv));
        assert_eq!(OutputFormat::parse("xlsx"), None);
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
