use crate::core::template::TEMPLATE_VOCABULARY_VERSION;
use crate::domain::ports::{ConfigProvider, Margins, PageLayout, PageSize};
use crate::utils::error::{ContractError, Result};
use crate::utils::validation::{validate_css_length, validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PUBLIC_PREFIX: &str = "/contracts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub template: TemplateConfig,
    pub render: RenderConfig,
    pub storage: StorageConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub path: String,
    /// 模板所對應的 token 版本，設定時必須與程式一致
    pub vocabulary_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub layout: Option<LayoutConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_size: Option<PageSize>,
    /// 四邊共用的邊界，個別設定優先
    pub margin: Option<String>,
    pub margin_top: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub print_background: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub output_dir: String,
    pub public_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl LayoutConfig {
    fn margins(&self) -> Margins {
        let base = self.margin.clone().unwrap_or_else(|| Margins::default().top);
        let side = |value: &Option<String>| value.clone().unwrap_or_else(|| base.clone());
        Margins {
            top: side(&self.margin_top),
            right: side(&self.margin_right),
            bottom: side(&self.margin_bottom),
            left: side(&self.margin_left),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContractError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ContractError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RENDER_ENDPOINT})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| ContractError::ConfigError {
            message: format!("invalid env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("template.path", &self.template.path)?;
        validate_url("render.endpoint", &self.render.endpoint)?;
        validate_path("storage.output_dir", &self.storage.output_dir)?;

        if let Some(timeout) = self.render.timeout_seconds {
            validate_range("render.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(version) = self.template.vocabulary_version {
            if version != TEMPLATE_VOCABULARY_VERSION {
                return Err(ContractError::ConfigValidationError {
                    field: "template.vocabulary_version".to_string(),
                    message: format!(
                        "template targets vocabulary v{} but this build provides v{}",
                        version, TEMPLATE_VOCABULARY_VERSION
                    ),
                });
            }
        }

        let margins = self.page_layout().margins;
        validate_css_length("render.layout.margin_top", &margins.top)?;
        validate_css_length("render.layout.margin_right", &margins.right)?;
        validate_css_length("render.layout.margin_bottom", &margins.bottom)?;
        validate_css_length("render.layout.margin_left", &margins.left)?;

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn template_path(&self) -> &str {
        &self.template.path
    }

    fn render_endpoint(&self) -> &str {
        &self.render.endpoint
    }

    fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn page_layout(&self) -> PageLayout {
        let layout = self.render.layout.clone().unwrap_or_default();
        PageLayout {
            page_size: layout.page_size.unwrap_or_default(),
            margins: layout.margins(),
            print_background: layout.print_background.unwrap_or(true),
        }
    }

    fn output_dir(&self) -> &str {
        &self.storage.output_dir
    }

    fn public_prefix(&self) -> &str {
        self.storage
            .public_prefix
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_PREFIX)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
