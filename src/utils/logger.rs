use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "venue_contracts";

/// RUST_LOG 優先；否則本 crate 用 info/debug，其他 crate 只顯示警告
fn contract_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{}={},warn", CRATE_TARGET, level))
    })
}

/// Human-readable output for the command line tools.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_cli_logger(verbose: bool) -> bool {
    tracing_subscriber::registry()
        .with(contract_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

/// 批次或服務部署使用 JSON 格式，方便集中收集日誌
pub fn init_json_logger() -> bool {
    tracing_subscriber::registry()
        .with(contract_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_reported() {
        // 同一個 process 只能安裝一次全域 subscriber
        let first = init_cli_logger(false);
        let second = init_json_logger();
        assert!(!(first && second));
        assert!(!init_cli_logger(true));
    }
}
