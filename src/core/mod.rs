pub mod classify;
pub mod enrich;
pub mod etl;
pub mod events;
pub mod export;
pub mod extract;
pub mod harmonize;
pub mod pipeline;
pub mod schema;
pub mod xml;

pub use crate::domain::model::{Batch, ConsolidationResult, EventType};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use classify::classify;
pub use enrich::{enrich, Enricher};
pub use export::Workbook;
pub use extract::{extract, Extractor};
pub use harmonize::harmonize;
pub use pipeline::{consolidate, ConsolidationPipeline};
