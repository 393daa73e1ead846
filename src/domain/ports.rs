use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!("unsupported page size '{}' (A4, Letter, Legal)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Margins {
    pub fn uniform(value: &str) -> Self {
        Self {
            top: value.to_string(),
            right: value.to_string(),
            bottom: value.to_string(),
            left: value.to_string(),
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform("20px")
    }
}

/// Page layout handed to the render engine together with the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_size: PageSize,
    pub margins: Margins,
    pub print_background: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            print_background: true,
        }
    }
}

/// Where a stored contract ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRef {
    /// 對外公開的路徑，例如 /contracts/contract_xxx.pdf
    pub public_path: String,
    pub file_path: PathBuf,
}

pub trait TemplateSource: Send + Sync {
    /// 每次渲染都重新載入；失敗時回傳 TemplateUnavailable
    fn load(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ArtifactStore: Send + Sync {
    /// 儲存產出的文件；同時進行的請求絕不會拿到相同的參照
    fn store(
        &self,
        suggested_name: &str,
        payload: &[u8],
    ) -> impl std::future::Future<Output = Result<ArtifactRef>> + Send;
}

/// An exclusive session inside the document-rendering engine.
#[async_trait]
pub trait RenderSession: Send + 'static {
    async fn set_content(&mut self, markup: &str) -> Result<()>;
    async fn print(&mut self, layout: &PageLayout) -> Result<Vec<u8>>;
    async fn close(self) -> Result<()>;
}

#[async_trait]
pub trait RenderEngine: Send + Sync {
    type Session: RenderSession;

    /// 開啟一個新的 session；連線或啟動失敗時回傳 RenderFailure(Launch)
    async fn launch(&self) -> Result<Self::Session>;
}

pub trait ConfigProvider: Send + Sync {
    fn template_path(&self) -> &str;
    fn render_endpoint(&self) -> &str;
    fn render_timeout(&self) -> Duration;
    fn page_layout(&self) -> PageLayout;
    fn output_dir(&self) -> &str;
    fn public_prefix(&self) -> &str;
}
