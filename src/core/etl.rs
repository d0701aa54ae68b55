use crate::core::Pipeline;
use crate::domain::model::Notice;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("📥 Extracting documents...");
        let batch = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} documents", batch.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Consolidating documents...");
        let result = self.pipeline.transform(batch).await?;
        tracing::info!(
            "🔄 Parsed {}/{} documents into {} event types",
            result.documents_parsed,
            result.documents_read,
            result.tables.len()
        );
        for notice in &result.notices {
            match notice {
                Notice::Incomplete { .. } => tracing::info!("ℹ️ {}", notice),
                _ => tracing::warn!("⚠️ {}", notice),
            }
        }
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Writing workbook...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Batch, ConsolidationResult, EventType, RawDocument, Upload};
    use crate::domain::table::TableSet;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        loads: AtomicUsize,
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<Batch> {
            if self.fail_extract {
                return Err(EtlError::processing("extract failed"));
            }
            Ok(Batch {
                uploads: vec![Upload {
                    expected: EventType::RateTable,
                    document: RawDocument::new("a.xml", b"<a/>".to_vec()),
                }],
                notices: vec![],
            })
        }

        async fn transform(&self, batch: Batch) -> Result<ConsolidationResult> {
            Ok(ConsolidationResult {
                tables: vec![(EventType::RateTable, TableSet::new())],
                documents_read: batch.len(),
                documents_parsed: batch.len(),
                notices: vec![Notice::Incomplete {
                    missing: vec!["S-1200".to_string()],
                }],
                ..Default::default()
            })
        }

        async fn load(&self, result: ConsolidationResult) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("out/{}.zip", result.documents_parsed))
        }
    }

    #[tokio::test]
    async fn test_run_chains_phases() {
        let engine = EtlEngine::new(CountingPipeline {
            loads: AtomicUsize::new(0),
            fail_extract: false,
        });
        assert_eq!(engine.run().await.unwrap(), "out/1.zip");
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_extract_error() {
        let engine = EtlEngine::new_with_monitoring(
            CountingPipeline {
                loads: AtomicUsize::new(0),
                fail_extract: true,
            },
            true,
        );
        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }
}
