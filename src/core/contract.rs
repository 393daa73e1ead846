use crate::core::normalizer::Normalizer;
use crate::core::render::render_document;
use crate::core::template::TemplateRenderer;
use crate::domain::ports::{ArtifactRef, ArtifactStore, PageLayout, RenderEngine, TemplateSource};
use crate::domain::submission::Submission;
use crate::utils::error::{ContractError, Result};
use crate::utils::monitor::{PhaseMonitor, PhaseStats};
use serde::Serialize;
use std::time::Duration;

/// 建議檔名，實際檔名由 ArtifactStore 決定
pub const SUGGESTED_NAME: &str = "contract.pdf";

/// A finished, stored contract.
#[derive(Debug, Clone)]
pub struct GeneratedContract {
    pub artifact: ArtifactRef,
    pub payload: Vec<u8>,
    /// 只有開啟監控時才有內容，且只屬於這一次請求
    pub phases: Vec<PhaseStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// All-or-nothing result handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip)]
    pub payload: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl GenerationResponse {
    pub fn from_result(result: Result<GeneratedContract>) -> Self {
        match result {
            Ok(contract) => Self {
                success: true,
                status_code: 200,
                file_path: Some(contract.artifact.public_path),
                payload_bytes: Some(contract.payload.len()),
                payload: Some(contract.payload),
                error: None,
            },
            Err(e) => Self {
                success: false,
                status_code: e.status_code(),
                file_path: None,
                payload: None,
                payload_bytes: None,
                error: Some(ErrorBody {
                    kind: e.kind().to_string(),
                    message: e.user_friendly_message(),
                }),
            },
        }
    }
}

/// Runs submission → booking → markup → document → stored artifact.
pub struct ContractGenerator<T: TemplateSource, E: RenderEngine, S: ArtifactStore> {
    templates: T,
    engine: E,
    store: S,
    layout: PageLayout,
    render_timeout: Duration,
    normalizer: Normalizer,
    renderer: TemplateRenderer,
    monitor: PhaseMonitor,
}

impl<T: TemplateSource, E: RenderEngine, S: ArtifactStore> ContractGenerator<T, E, S> {
    pub fn new(templates: T, engine: E, store: S, layout: PageLayout, render_timeout: Duration) -> Self {
        Self::new_with_monitoring(templates, engine, store, layout, render_timeout, false)
    }

    pub fn new_with_monitoring(
        templates: T,
        engine: E,
        store: S,
        layout: PageLayout,
        render_timeout: Duration,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            templates,
            engine,
            store,
            layout,
            render_timeout,
            normalizer: Normalizer::new(),
            renderer: TemplateRenderer::new(),
            monitor: PhaseMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &PhaseMonitor {
        &self.monitor
    }

    pub async fn generate(&self, submission: &Submission) -> Result<GeneratedContract> {
        tracing::info!("📝 Generating contract from submission with {} field(s)", submission.len());

        let mut phases = self.monitor.begin();

        // Normalize
        let started = phases.start();
        let record = self.normalizer.normalize(submission)?;
        phases.record("Normalize", started);

        // Template
        let started = phases.start();
        let template = self.templates.load().await?;
        let markup = self.renderer.render(&template, &record).into_markup()?;
        phases.record("Template", started);
        tracing::debug!("Rendered markup ({} bytes)", markup.len());

        // Render
        let started = phases.start();
        let payload = render_document(&self.engine, &markup, &self.layout, self.render_timeout).await?;
        phases.record("Render", started);

        // Store
        let started = phases.start();
        let artifact = self.store.store(SUGGESTED_NAME, &payload).await?;
        phases.record("Store", started);

        tracing::info!("✅ Contract stored at {}", artifact.public_path);
        phases.log_final_stats();

        Ok(GeneratedContract {
            artifact,
            payload,
            phases: phases.into_phases(),
        })
    }

    /// 不會回傳 Err：失敗時轉成帶有分類的回應
    pub async fn respond(&self, submission: &Submission) -> GenerationResponse {
        let result = self.generate(submission).await;
        if let Err(e) = &result {
            log_failure(e);
        }
        GenerationResponse::from_result(result)
    }
}

fn log_failure(e: &ContractError) {
    if e.status_code() < 500 {
        tracing::warn!("⚠️ Contract request rejected: {}", e);
    } else {
        tracing::error!(
            "❌ Contract generation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    }
}
