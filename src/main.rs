use clap::Parser;
use venue_contracts::utils::error::{ContractError, ErrorSeverity};
use venue_contracts::utils::{logger, validation::Validate};
use venue_contracts::{generator_from_config, CliConfig, GenerationResponse, Submission};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting venue-contracts CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let generator = generator_from_config(&config, monitor_enabled);

    let result = match load_submission(&config.submission) {
        Ok(submission) => generator.generate(&submission).await,
        Err(e) => Err(e),
    };
    let exit_code = match &result {
        Ok(contract) => {
            tracing::info!("✅ Contract generated successfully!");
            tracing::info!("📁 Output saved to: {}", contract.artifact.file_path.display());
            if !config.json {
                println!("✅ Contract generated successfully!");
                println!("📁 Saved to: {}", contract.artifact.public_path);
            }
            0
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Contract generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            if !config.json {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());
            }
            exit_code(e.severity())
        }
    };

    if config.json {
        let response = GenerationResponse::from_result(result);
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn load_submission(path: &str) -> Result<Submission, ContractError> {
    let content = std::fs::read_to_string(path)?;
    Submission::from_json_str(&content)
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}
