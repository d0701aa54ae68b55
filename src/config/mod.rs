pub mod cli;
pub mod toml_config;

use crate::domain::model::EventType;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_file_extensions, validate_non_empty_string};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_output_formats, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_ARCHIVE_NAME: &str = "s1010_s2299_s1200.zip";

/// 三個步驟的輸入檔案
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputFiles {
    #[serde(default)]
    pub s1010: Vec<String>,
    #[serde(default)]
    pub s1200: Vec<String>,
    #[serde(default)]
    pub s2299: Vec<String>,
}

impl InputFiles {
    pub fn files_for(&self, event: &EventType) -> &[String] {
        match event {
            EventType::RateTable => &self.s1010,
            EventType::Compensation => &self.s1200,
            EventType::Termination => &self.s2299,
            EventType::Other(_) | EventType::Unknown => &[],
        }
    }

    pub fn total(&self) -> usize {
        self.s1010.len() + self.s1200.len() + self.s2299.len()
    }

    pub fn validate_files(&self, prefix: &str) -> Result<()> {
        if self.total() == 0 {
            return Err(EtlError::MissingConfigError {
                field: format!("{}s1010/s1200/s2299", prefix),
            });
        }
        for (field, files) in [
            ("s1010", &self.s1010),
            ("s1200", &self.s1200),
            ("s2299", &self.s2299),
        ] {
            validate_file_extensions(&format!("{}{}", prefix, field), files, &["xml"])?;
        }
        Ok(())
    }

    /// 相對路徑改以 `base_dir` 為準，讓儲存體以輸出目錄為根時仍能讀到輸入
    pub fn resolve_relative_to(&mut self, base_dir: &Path) {
        resolve_paths(base_dir, [&mut self.s1010, &mut self.s1200, &mut self.s2299]);
    }
}

fn resolve_paths(base_dir: &Path, lists: [&mut Vec<String>; 3]) {
    for files in lists {
        for file in files.iter_mut() {
            if Path::new(file.as_str()).is_relative() {
                *file = base_dir.join(file.as_str()).to_string_lossy().into_owned();
            }
        }
    }
}

pub fn validate_archive_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;
    if name.contains('/') || name.contains('\\') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Archive name must be a file name, not a path".to_string(),
        });
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "esocial-etl")]
#[command(about = "Consolidates eSocial S-1010, S-1200 and S-2299 XML files into a workbook")]
pub struct CliConfig {
    /// S-1010 rate table files
    #[arg(long, value_delimiter = ',')]
    pub s1010: Vec<String>,

    /// S-1200 compensation files
    #[arg(long, value_delimiter = ',')]
    pub s1200: Vec<String>,

    /// S-2299 termination files
    #[arg(long, value_delimiter = ',')]
    pub s2299: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 解析並驗證後呼叫
    pub fn prepare(&mut self) -> Result<()> {
        let cwd = std::env::current_dir()?;
        resolve_paths(&cwd, [&mut self.s1010, &mut self.s1200, &mut self.s2299]);
        Ok(())
    }

    pub fn inputs(&self) -> InputFiles {
        InputFiles {
            s1010: self.s1010.clone(),
            s1200: self.s1200.clone(),
            s2299: self.s2299.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn files_for(&self, event: &EventType) -> &[String] {
        match event {
            EventType::RateTable => &self.s1010,
            EventType::Compensation => &self.s1200,
            EventType::Termination => &self.s2299,
            EventType::Other(_) | EventType::Unknown => &[],
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats
            .iter()
            .filter_map(|f| OutputFormat::parse(f))
            .collect()
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.inputs().validate_files("")?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("formats", &self.formats)?;
        validate_archive_name("archive_name", &self.archive_name)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("esocial-etl").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--s1010", "a.xml"]);
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.archive_name(), DEFAULT_ARCHIVE_NAME);
        assert_eq!(config.output_formats(), vec![OutputFormat::Csv]);
        assert!(!config.verbose && !config.monitor && !config.log_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_comma_separated_inputs() {
        let config = parse(&[
            "--s1200",
            "jan.xml,feb.xml",
            "--s2299",
            "out.xml",
            "--formats",
            "csv,json",
        ]);
        assert_eq!(config.files_for(&EventType::Compensation).len(), 2);
        assert_eq!(config.files_for(&EventType::Termination), ["out.xml".to_string()]);
        assert!(config.files_for(&EventType::RateTable).is_empty());
        assert_eq!(
            config.output_formats(),
            vec![OutputFormat::Csv, OutputFormat::Json]
        );
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            parse(&[]).validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
        assert!(parse(&["--s1010", "a.txt"]).validate().is_err());
        assert!(parse(&["--s1010", "a.xml", "--formats", "xlsx"]).validate().is_err());
        assert!(parse(&["--s1010", "a.xml", "--archive-name", "dir/out.zip"])
            .validate()
            .is_err());
    }

    #[test]
    fn test_prepare_makes_inputs_absolute() {
        let mut config = parse(&["--s1010", "in/a.xml"]);
        config.prepare().unwrap();
        let file = &config.files_for(&EventType::RateTable)[0];
        assert!(Path::new(file).is_absolute());
        assert!(file.ends_with("a.xml"));
    }
}
