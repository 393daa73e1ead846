pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::{ConfigProvider, Margins, PageLayout, PageSize};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_css_length, validate_path, validate_range, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "venue-contracts")]
#[command(about = "Generate a venue booking contract PDF from a form submission")]
pub struct CliConfig {
    /// JSON 檔案，內容為表單欄位 (key → 字串或布林)
    #[arg(long)]
    pub submission: String,

    #[arg(long, default_value = "templates/contract-template.html")]
    pub template: String,

    #[arg(long, default_value = "http://localhost:3000")]
    pub render_endpoint: String,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "./public/contracts")]
    pub output_dir: String,

    #[arg(long, default_value = "/contracts")]
    pub public_prefix: String,

    #[arg(long, default_value = "A4")]
    pub page_size: PageSize,

    #[arg(long, default_value = "20px")]
    pub margin: String,

    #[arg(long, help = "Do not print background colors and images")]
    pub no_background: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Record per-phase timing and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Print the response as JSON")]
    pub json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn template_path(&self) -> &str {
        &self.template
    }

    fn render_endpoint(&self) -> &str {
        &self.render_endpoint
    }

    fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn page_layout(&self) -> PageLayout {
        PageLayout {
            page_size: self.page_size,
            margins: Margins::uniform(&self.margin),
            print_background: !self.no_background,
        }
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn public_prefix(&self) -> &str {
        &self.public_prefix
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("submission", &self.submission)?;
        validate_path("template", &self.template)?;
        validate_url("render_endpoint", &self.render_endpoint)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 600)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_css_length("margin", &self.margin)?;
        Ok(())
    }
}
