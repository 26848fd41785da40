use agent_importer::utils::{logger, validation::Validate};
use agent_importer::{CliConfig, CsvRecordSource, LocalStorage, MigrationEngine};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting agent-importer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 解析配置（CLI 旗標或 TOML 檔案）
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration loading failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let dry_run = config.dry_run;
    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
    }

    // 創建來源、存儲與引擎
    let source = CsvRecordSource::new(
        LocalStorage::new(".".to_string()),
        config.input_path.clone(),
    );
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = MigrationEngine::new(source, storage, config);

    match engine.run().await {
        Ok(summary) => {
            if dry_run {
                println!("🔍 Dry run complete, nothing was submitted");
            } else {
                tracing::info!("✅ Migration run completed");
                println!(
                    "✅ Migration run completed: {} created, {} failed of {} attempted",
                    summary.created,
                    summary.failed(),
                    summary.attempted
                );
                if summary.failed() > 0 {
                    println!("📁 Failed emails: {}", summary.failed_emails.join(", "));
                }
            }
        }
        Err(e) => {
            tracing::error!("❌ Migration run failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
