//! Acquire / use / release scope around one render-engine session.
//!
//! Every call opens its own session and closes it on every exit path. A launch
//! failure is retried exactly once; content failures and timeouts are not.
//! Closing is bounded by the same limit as launch and render, and a close that
//! fails or times out is only logged. If the surrounding future is dropped
//! mid-render, [`SessionGuard`] closes the session from a spawned task.
//! Sessions the engine creates after a launch timeout are the adapter's to
//! clean up (see `HttpRenderEngine::launch`).

use crate::domain::ports::{PageLayout, RenderEngine, RenderSession};
use crate::utils::error::{ContractError, RenderFailureKind, Result};
use std::time::Duration;
use tokio::time::timeout;

const LAUNCH_ATTEMPTS: u32 = 2;

/// Owns a session until it is explicitly released or dropped.
pub struct SessionGuard<S: RenderSession> {
    session: Option<S>,
    close_limit: Duration,
}

impl<S: RenderSession> SessionGuard<S> {
    pub fn new(session: S, close_limit: Duration) -> Self {
        Self {
            session: Some(session),
            close_limit,
        }
    }

    fn session_mut(&mut self) -> Result<&mut S> {
        self.session.as_mut().ok_or_else(|| {
            ContractError::render(RenderFailureKind::Content, "render session already released")
        })
    }

    /// 關閉 session；關閉失敗或逾時只記錄，不影響渲染結果
    pub async fn release(mut self) {
        if let Some(session) = self.session.take() {
            close_bounded(session, self.close_limit).await;
        }
    }
}

async fn close_bounded<S: RenderSession>(session: S, limit: Duration) {
    match timeout(limit, session.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("⚠️ Failed to close render session: {}", e),
        Err(_) => tracing::warn!("⚠️ Render session did not close within {:?}, abandoning it", limit),
    }
}

impl<S: RenderSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        // 被取消時無法 await，交給 runtime 在背景關閉
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("Render scope dropped, closing session in background");
                handle.spawn(close_bounded(session, self.close_limit));
            }
            Err(_) => tracing::error!("❌ Render session leaked: no runtime available to close it"),
        }
    }
}

/// Opens a session, retrying once if the engine fails to launch.
pub async fn launch_session<E: RenderEngine>(
    engine: &E,
    limit: Duration,
) -> Result<E::Session> {
    let mut attempt = 1;
    loop {
        let outcome = match timeout(limit, engine.launch()).await {
            Ok(result) => result,
            Err(_) => Err(ContractError::render(
                RenderFailureKind::Timeout,
                format!("render engine did not start within {:?}", limit),
            )),
        };

        match outcome {
            Ok(session) => return Ok(session),
            Err(e) if e.is_retryable() && attempt < LAUNCH_ATTEMPTS => {
                tracing::warn!(
                    "🔄 Render engine launch failed (attempt {}/{}): {}",
                    attempt,
                    LAUNCH_ATTEMPTS,
                    e
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Renders `markup` into a paginated document inside one exclusive session.
pub async fn render_document<E: RenderEngine>(
    engine: &E,
    markup: &str,
    layout: &PageLayout,
    limit: Duration,
) -> Result<Vec<u8>> {
    let session = launch_session(engine, limit).await?;
    let mut guard = SessionGuard::new(session, limit);

    let outcome = timeout(limit, async {
        let session = guard.session_mut()?;
        session.set_content(markup).await?;
        session.print(layout).await
    })
    .await;

    guard.release().await;

    match outcome {
        Ok(Ok(document)) => {
            tracing::debug!("Render engine produced {} bytes", document.len());
            Ok(document)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ContractError::render(
            RenderFailureKind::Timeout,
            format!("render did not finish within {:?}", limit),
        )),
    }
}
