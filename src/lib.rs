pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{etl::EtlEngine, pipeline::ConsolidationPipeline};
pub use domain::model::{ConsolidationResult, EventType, Notice, OutputFormat, RawDocument};
pub use domain::table::{Table, TableSet, Value};
pub use utils::error::{EtlError, Result};
