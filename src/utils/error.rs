use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 渲染失敗的細分類型，只有 Launch 可以重試
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderFailureKind {
    /// 引擎無法啟動或無法連線
    Launch,
    /// 內容造成的失敗，重試也會再次失敗
    Content,
    /// 超過時間限制
    Timeout,
}

impl fmt::Display for RenderFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RenderFailureKind::Launch => "launch",
            RenderFailureKind::Content => "content",
            RenderFailureKind::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Malformed request: field '{field}' {reason}")]
    MalformedRequest { field: String, reason: String },

    #[error("Template mismatch: unresolved tokens [{}]", .tokens.join(", "))]
    TemplateMismatch { tokens: Vec<String> },

    #[error("Template unavailable: {message}")]
    TemplateUnavailable { message: String },

    #[error("Render failure ({kind}): {message}")]
    RenderFailure {
        kind: RenderFailureKind,
        message: String,
    },

    #[error("Storage failure: {message}")]
    StorageFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 請求本身有問題，呼叫端需要修正輸入
    Client,
    /// 模板、渲染引擎或儲存出錯
    Server,
    /// 暫時無法提供服務 (例如模板檔讀不到)
    Unavailable,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContractError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        ContractError::MalformedRequest {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn render(kind: RenderFailureKind, message: impl Into<String>) -> Self {
        ContractError::RenderFailure {
            kind,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ContractError::StorageFailure {
            message: message.into(),
        }
    }

    /// 穩定的錯誤分類字串，回應給呼叫端使用
    pub fn kind(&self) -> &'static str {
        match self {
            ContractError::MalformedRequest { .. } => "MalformedRequest",
            ContractError::TemplateMismatch { .. } => "TemplateMismatch",
            ContractError::TemplateUnavailable { .. } => "TemplateUnavailable",
            ContractError::RenderFailure { .. } => "RenderFailure",
            ContractError::StorageFailure { .. } => "StorageFailure",
            ContractError::IoError(_) => "IoError",
            ContractError::SerializationError(_) => "SerializationError",
            ContractError::CsvError(_) => "CsvError",
            ContractError::ConfigError { .. }
            | ContractError::ConfigValidationError { .. }
            | ContractError::InvalidConfigValueError { .. }
            | ContractError::MissingConfigError { .. } => "ConfigError",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::MalformedRequest { .. }
            | ContractError::SerializationError(_)
            | ContractError::CsvError(_) => ErrorCategory::Client,
            ContractError::TemplateUnavailable { .. } => ErrorCategory::Unavailable,
            ContractError::TemplateMismatch { .. }
            | ContractError::RenderFailure { .. }
            | ContractError::StorageFailure { .. }
            | ContractError::IoError(_) => ErrorCategory::Server,
            ContractError::ConfigError { .. }
            | ContractError::ConfigValidationError { .. }
            | ContractError::InvalidConfigValueError { .. }
            | ContractError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::MalformedRequest { .. }
            | ContractError::SerializationError(_)
            | ContractError::CsvError(_) => ErrorSeverity::High,
            ContractError::RenderFailure {
                kind: RenderFailureKind::Launch | RenderFailureKind::Timeout,
                ..
            } => ErrorSeverity::Medium,
            ContractError::RenderFailure { .. } | ContractError::TemplateMismatch { .. } => {
                ErrorSeverity::High
            }
            ContractError::TemplateUnavailable { .. }
            | ContractError::StorageFailure { .. }
            | ContractError::IoError(_) => ErrorSeverity::Critical,
            ContractError::ConfigError { .. }
            | ContractError::ConfigValidationError { .. }
            | ContractError::InvalidConfigValueError { .. }
            | ContractError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 對應的 HTTP 狀態碼：輸入錯誤 400、暫停服務 503，其餘 500
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            ErrorCategory::Unavailable => 503,
            ErrorCategory::Server | ErrorCategory::Configuration => 500,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ContractError::RenderFailure {
                kind: RenderFailureKind::Launch,
                ..
            }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ContractError::MalformedRequest { field, .. } => {
                format!("Fill in '{}' with a valid value and submit again", field)
            }
            ContractError::TemplateMismatch { .. } => {
                "The contract template and the token vocabulary are out of sync; deploy a matching template version".to_string()
            }
            ContractError::TemplateUnavailable { .. } => {
                "Check that the template file exists and is readable by the service".to_string()
            }
            ContractError::RenderFailure { kind, .. } => match kind {
                RenderFailureKind::Launch => {
                    "Make sure the render service is running and reachable".to_string()
                }
                RenderFailureKind::Timeout => {
                    "The render service is slow; retry later or raise the render timeout".to_string()
                }
                RenderFailureKind::Content => {
                    "The generated markup was rejected by the render service; inspect the template".to_string()
                }
            },
            ContractError::StorageFailure { .. } | ContractError::IoError(_) => {
                "Check free disk space and permissions of the output directory".to_string()
            }
            ContractError::SerializationError(_) => {
                "The submission file must be a flat JSON object".to_string()
            }
            ContractError::CsvError(_) => {
                "The batch file must be a CSV with a header row of submission keys".to_string()
            }
            ContractError::ConfigError { .. }
            | ContractError::ConfigValidationError { .. }
            | ContractError::InvalidConfigValueError { .. }
            | ContractError::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ContractError::MalformedRequest { field, reason } => {
                format!("The booking form is incomplete: '{}' {}", field, reason)
            }
            ContractError::TemplateMismatch { tokens } => format!(
                "The contract template contains {} unknown placeholder(s)",
                tokens.len()
            ),
            ContractError::TemplateUnavailable { .. } => {
                "The contract template is currently unavailable".to_string()
            }
            ContractError::RenderFailure { kind, .. } => {
                format!("The contract document could not be produced ({})", kind)
            }
            ContractError::StorageFailure { .. } => {
                "The contract document could not be saved".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
