//! HTTP client for a session-based document render service.
//!
//! ```text
//! POST   {base}/sessions                -> {"session_id": "..."}
//! PUT    {base}/sessions/{id}/content   text/html body
//! POST   {base}/sessions/{id}/pdf       JSON page layout -> PDF bytes
//! DELETE {base}/sessions/{id}
//! ```

use crate::domain::ports::{PageLayout, RenderEngine, RenderSession};
use crate::utils::error::{ContractError, RenderFailureKind, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

/// 呼叫端放棄等待後才建立好的 session，在背景關閉時的上限
const ORPHAN_CLOSE_LIMIT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SessionCreated {
    session_id: String,
}

#[derive(Debug, Clone)]
pub struct HttpRenderEngine {
    client: Client,
    base_url: String,
}

impl HttpRenderEngine {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// `{base}/sessions/{id}` with the id as a single percent-encoded segment.
fn session_url(base_url: &str, session_id: &str) -> Result<Url> {
    if matches!(session_id, "" | "." | "..") {
        return Err(launch_error(format!("invalid session id '{}'", session_id)));
    }
    let mut url = Url::parse(base_url)
        .map_err(|e| launch_error(format!("invalid render endpoint '{}': {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| launch_error(format!("render endpoint '{}' cannot hold a path", base_url)))?
        .pop_if_empty()
        .push("sessions")
        .push(session_id);
    Ok(url)
}

async fn open_session(client: Client, base_url: String) -> Result<HttpRenderSession> {
    let url = format!("{}/sessions", base_url);
    tracing::debug!("Opening render session at: {}", url);

    let response = client
        .post(&url)
        .send()
        .await
        .map_err(|e| launch_error(format!("render service unreachable: {}", e)))?;

    if !response.status().is_success() {
        return Err(launch_error(format!(
            "render service refused a new session with status: {}",
            response.status()
        )));
    }

    let created: SessionCreated = response
        .json()
        .await
        .map_err(|e| launch_error(format!("invalid session response: {}", e)))?;

    tracing::debug!("Render session opened: {}", created.session_id);
    Ok(HttpRenderSession {
        client,
        session_url: session_url(&base_url, &created.session_id)?,
    })
}

#[async_trait]
impl RenderEngine for HttpRenderEngine {
    type Session = HttpRenderSession;

    /// 建立 session 的請求在背景任務中進行；若呼叫端已逾時放棄，
    /// 晚到的 session 會由該任務自行刪除，不會殘留在服務端
    async fn launch(&self) -> Result<HttpRenderSession> {
        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        let base_url = self.base_url.clone();

        tokio::spawn(async move {
            let opened = open_session(client, base_url).await;
            if let Err(Ok(orphan)) = tx.send(opened) {
                tracing::warn!("⚠️ Render session {} arrived after launch was abandoned, closing it", orphan.url());
                match tokio::time::timeout(ORPHAN_CLOSE_LIMIT, orphan.close()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!("⚠️ Failed to close abandoned render session: {}", e),
                    Err(_) => tracing::warn!("⚠️ Closing abandoned render session timed out"),
                }
            }
        });

        rx.await
            .map_err(|_| launch_error("render session request was aborted".to_string()))?
    }
}

#[derive(Debug)]
pub struct HttpRenderSession {
    client: Client,
    session_url: Url,
}

impl HttpRenderSession {
    pub fn url(&self) -> &str {
        self.session_url.as_str()
    }

    fn endpoint(&self, action: &str) -> Url {
        let mut url = self.session_url.clone();
        // session_url 一定是可加路徑的 http(s) URL
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(action);
        }
        url
    }
}

#[async_trait]
impl RenderSession for HttpRenderSession {
    async fn set_content(&mut self, markup: &str) -> Result<()> {
        let response = self
            .client
            .put(self.endpoint("content"))
            .header(reqwest::header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(markup.to_string())
            .send()
            .await
            .map_err(|e| content_error(format!("failed to submit markup: {}", e)))?;

        ensure_success(response, "markup").await?;
        Ok(())
    }

    async fn print(&mut self, layout: &PageLayout) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.endpoint("pdf"))
            .json(layout)
            .send()
            .await
            .map_err(|e| content_error(format!("failed to request document: {}", e)))?;

        let response = ensure_success(response, "document").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| content_error(format!("failed to read document: {}", e)))?;

        if bytes.is_empty() {
            return Err(content_error("render service returned an empty document".to_string()));
        }
        Ok(bytes.to_vec())
    }

    async fn close(self) -> Result<()> {
        let response = self
            .client
            .delete(self.session_url.clone())
            .send()
            .await
            .map_err(|e| content_error(format!("failed to close session: {}", e)))?;

        ensure_success(response, "session close").await?;
        tracing::debug!("Render session closed: {}", self.session_url);
        Ok(())
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(content_error(format!(
        "render service rejected the {} with status {}: {}",
        what,
        status,
        body.chars().take(200).collect::<String>()
    )))
}

fn launch_error(message: String) -> ContractError {
    ContractError::render(RenderFailureKind::Launch, message)
}

fn content_error(message: String) -> ContractError {
    ContractError::render(RenderFailureKind::Content, message)
}
