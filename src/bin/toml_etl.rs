use anyhow::Context;
use clap::Parser;
use esocial_etl::core::ConfigProvider;
use esocial_etl::utils::{logger, validation::Validate};
use esocial_etl::{ConsolidationPipeline, EtlEngine, EventType, LocalStorage, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "eSocial consolidation with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "esocial-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based eSocial ETL tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config_dir = Path::new(&args.config)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .map_or_else(std::env::current_dir, Ok)
        .context("cannot determine the configuration directory")?;
    config.resolve_inputs(&config_dir);

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ConsolidationPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let output_path = engine.run().await.map_err(|e| {
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        anyhow::anyhow!(e.user_friendly_message())
    })?;

    tracing::info!("✅ ETL process completed successfully!");
    println!("✅ ETL process completed successfully!");
    println!("📁 Output saved to: {}", output_path);

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Description: {}", config.pipeline.description);
    for event in EventType::SUPPORTED {
        println!("  {} files: {}", event, config.files_for(&event).len());
    }
    println!("  Output: {}/{}", config.output_path(), config.archive_name());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📥 Input Files:");
    for event in EventType::SUPPORTED {
        let files = config.files_for(&event);
        if files.is_empty() {
            println!("  {}: (none)", event);
            continue;
        }
        for file in files {
            let status = if Path::new(file).exists() {
                "✅"
            } else {
                "❌ not found"
            };
            println!("  {}: {} {}", event, file, status);
        }
    }

    let missing: Vec<String> = EventType::SUPPORTED
        .iter()
        .filter(|event| config.files_for(event).is_empty())
        .map(|event| event.to_string())
        .collect();

    println!();
    println!("🔄 Consolidation:");
    if missing.is_empty() {
        println!("  ✅ All event types present, the consolidated line items sheet will be built");
    } else {
        println!(
            "  ⚠️ Missing {}, the consolidated line items sheet will be skipped",
            missing.join(", ")
        );
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Archive: {}", config.archive_name());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
