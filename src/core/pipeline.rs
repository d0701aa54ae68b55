use crate::core::classify::classify;
use crate::core::enrich::enrich;
use crate::core::export::Workbook;
use crate::core::extract::Extractor;
use crate::core::harmonize::harmonize;
use crate::core::schema::{RUBRICS_1010, RUBRICS_1200, RUBRICS_2299};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    Batch, ConsolidationResult, EventType, Notice, RawDocument, Upload,
};
use crate::domain::table::{Table, TableSet};
use crate::utils::error::{EtlError, Result};

/// 處理整批上傳：分類、擷取、依事件累積，三種事件齊全時產生合併表
pub fn consolidate(batch: Batch) -> ConsolidationResult {
    let Batch { uploads, notices } = batch;
    let mut result = ConsolidationResult {
        notices,
        ..Default::default()
    };

    for upload in uploads {
        result.documents_read += 1;
        let Upload { expected, document } = upload;

        let found = classify(&document.bytes);
        if !found.matches(&expected) {
            tracing::warn!(
                "🔶 {}: event {} does not belong to the {} step, skipping",
                document.file_name,
                found,
                expected
            );
            result.notices.push(Notice::Skipped {
                file: document.file_name,
                expected: expected.code().to_string(),
                found: found.code().to_string(),
            });
            continue;
        }

        match extract_document(&expected, &document) {
            Ok(tables) => {
                result.documents_parsed += 1;
                match result.tables.iter_mut().find(|(event, _)| *event == expected) {
                    Some((_, existing)) => existing.merge(tables),
                    None => result.tables.push((expected, tables)),
                }
            }
            Err(e) => {
                tracing::error!("❌ Failed to process {}: {}", document.file_name, e);
                result.notices.push(Notice::Failed {
                    file: document.file_name,
                    message: e.to_string(),
                });
            }
        }
    }

    let missing: Vec<String> = EventType::SUPPORTED
        .iter()
        .filter(|event| result.tables_for(event).is_none())
        .map(|event| event.code().to_string())
        .collect();

    if missing.is_empty() {
        match build_enriched(&result) {
            Ok(enriched) => result.enriched = Some(enriched),
            Err(e) => {
                tracing::error!("❌ Failed to build the consolidated line items: {}", e);
                result.notices.push(Notice::Failed {
                    file: RUBRICS_1200.to_string(),
                    message: e.to_string(),
                });
            }
        }
    } else {
        tracing::info!(
            "ℹ️ Consolidated line items skipped, missing: {}",
            missing.join(", ")
        );
        result.notices.push(Notice::Incomplete { missing });
    }

    result
}

fn extract_document(expected: &EventType, document: &RawDocument) -> Result<TableSet> {
    let extractor = Extractor::for_event(expected).ok_or_else(|| {
        EtlError::processing(format!("no extractor for event type {}", expected))
    })?;
    extractor.extract(&document.bytes, &document.file_name)
}

fn build_enriched(result: &ConsolidationResult) -> Result<Table> {
    let compensation = required_table(result, &EventType::Compensation, RUBRICS_1200)?;
    let termination = required_table(result, &EventType::Termination, RUBRICS_2299)?;
    let rate_table = required_table(result, &EventType::RateTable, RUBRICS_1010)?;

    let unified = compensation.concat(&harmonize(termination)?);
    enrich(&unified, rate_table)
}

fn required_table<'a>(
    result: &'a ConsolidationResult,
    event: &EventType,
    name: &str,
) -> Result<&'a Table> {
    result
        .tables_for(event)
        .and_then(|set| set.get(name))
        .ok_or_else(|| EtlError::processing(format!("{} has no '{}' table", event, name)))
}

/// 從儲存體讀取三個步驟的檔案並輸出 ZIP 活頁簿
pub struct ConsolidationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConsolidationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConsolidationPipeline<S, C> {
    async fn extract(&self) -> Result<Batch> {
        let mut batch = Batch::default();

        for event in EventType::SUPPORTED {
            let files = self.config.files_for(&event);
            tracing::debug!("📥 Reading {} file(s) for {}", files.len(), event);

            for path in files {
                match self.storage.read_file(path).await {
                    Ok(bytes) => batch.uploads.push(Upload {
                        expected: event.clone(),
                        document: RawDocument::new(file_label(path), bytes),
                    }),
                    Err(e) => {
                        tracing::error!("❌ Failed to read {}: {}", path, e);
                        batch.notices.push(Notice::Failed {
                            file: path.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            "📥 Read {} document(s), {} unreadable",
            batch.len(),
            batch.notices.len()
        );
        Ok(batch)
    }

    async fn transform(&self, batch: Batch) -> Result<ConsolidationResult> {
        let result = consolidate(batch);

        for (event, tables) in &result.tables {
            let summary: Vec<String> = tables
                .iter()
                .map(|t| format!("{}={}", t.name(), t.len()))
                .collect();
            tracing::info!("🔄 {}: {}", event, summary.join(", "));
        }
        if let Some(enriched) = &result.enriched {
            tracing::info!("🔄 {}: {} rows", enriched.name(), enriched.len());
        }

        Ok(result)
    }

    async fn load(&self, result: ConsolidationResult) -> Result<String> {
        if result.is_empty() {
            return Err(EtlError::processing(
                "no valid documents were found in any step",
            ));
        }

        let archive_name = self.config.archive_name();
        let output_path = format!("{}/{}", self.config.output_path(), archive_name);

        let workbook = Workbook::from_result(&result);
        let zip_data = workbook.to_zip(&self.config.output_formats())?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive_name, &zip_data).await?;

        tracing::info!("💾 Saved {} sheets to {}", workbook.len(), output_path);
        Ok(output_path)
    }
}

/// 表格中的來源欄位只保留檔名
fn file_label(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
