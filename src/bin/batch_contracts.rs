use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use venue_contracts::config::toml_config::TomlConfig;
use venue_contracts::domain::ports::ConfigProvider;
use venue_contracts::utils::{logger, validation::Validate};
use venue_contracts::{generator_from_config, GenerationResponse, Submission};

#[derive(Parser)]
#[command(name = "batch-contracts")]
#[command(about = "Generate one venue contract per CSV row using a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "contracts.toml")]
    config: String,

    /// CSV file, header row = submission field names
    #[arg(short, long)]
    submissions: String,

    /// Number of contracts rendered at the same time
    #[arg(long, default_value = "2")]
    concurrency: usize,

    /// Write the per-row JSON report to this file instead of stdout
    #[arg(long)]
    report: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - validate the rows without rendering anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Serialize)]
struct RowReport {
    /// 從 1 開始，不含標題列
    row: usize,
    #[serde(flatten)]
    response: GenerationResponse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting batch contract generation");
    tracing::info!("📁 Configuration: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let file = std::fs::File::open(&args.submissions)?;
    let submissions = Submission::from_csv_reader(file)?;
    tracing::info!("📋 Loaded {} submission(s) from {}", submissions.len(), args.submissions);

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No contracts will be rendered");
        perform_dry_run(&submissions);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let generator = Arc::new(generator_from_config(&config, monitor_enabled));
    let permits = Arc::new(Semaphore::new(args.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, submission) in submissions.into_iter().enumerate() {
        let generator = Arc::clone(&generator);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let response = generator.respond(&submission).await;
            RowReport {
                row: index + 1,
                response,
            }
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined?);
    }
    reports.sort_by_key(|report| report.row);

    let failed = reports.iter().filter(|r| !r.response.success).count();
    tracing::info!(
        "✅ Batch finished: {} generated, {} failed",
        reports.len() - failed,
        failed
    );

    let rendered = serde_json::to_string_pretty(&reports)?;
    match &args.report {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("📁 Report saved to: {}", path);
        }
        None => println!("{}", rendered),
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Service: {}", config.service.name);
    if let Some(description) = &config.service.description {
        tracing::info!("📝 Description: {}", description);
    }
    tracing::info!("📄 Template: {}", config.template_path());
    tracing::info!("🖨️ Render service: {}", config.render_endpoint());
    tracing::info!("⏱️ Render timeout: {:?}", config.render_timeout());
    tracing::info!("💾 Output: {} ({})", config.output_dir(), config.public_prefix());
}

fn perform_dry_run(submissions: &[Submission]) {
    let normalizer = venue_contracts::Normalizer::new();
    for (index, submission) in submissions.iter().enumerate() {
        match normalizer.normalize(submission) {
            Ok(record) => println!(
                "✅ Row {}: event on {} with {} venue line(s)",
                index + 1,
                record.event().date,
                record.venues().iter().filter(|v| v.checked).count()
            ),
            Err(e) => println!("❌ Row {}: {}", index + 1, e.user_friendly_message()),
        }
    }
}
