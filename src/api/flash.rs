//! One-shot notices carried across a redirect.
//!
//! Handlers and errors attach a [`FlashMessage`] to the response extensions;
//! [`persist_flash`] moves it into the session, and the next page view
//! drains it with [`take`].

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// `303 See Other` to `to`, leaving `flash` for the next page.
pub fn redirect_with(to: &str, flash: FlashMessage) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.extensions_mut().insert(flash);
    response
}

/// Drains pending notices. Session errors only cost the notices.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(FLASH_KEY).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read flash messages: {e}");
            Vec::new()
        }
    }
}

pub async fn persist_flash(session: Session, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(flash) = response.extensions_mut().remove::<FlashMessage>() {
        let mut pending = session
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        pending.push(flash);

        if let Err(e) = session.insert(FLASH_KEY, pending).await {
            tracing::warn!("Failed to store flash message: {e}");
        }
    }

    response
}
