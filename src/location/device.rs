use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tracing::debug;

use crate::app::AppMessage;
use crate::catalog::Coordinate;
use crate::location::{Accuracy, LocationError, Permission, PermissionApi, PositionApi, Reading};

/// Asks the user through the app's permission modal.
///
/// A prompt that is dropped without an answer counts as denied.
pub struct PromptPermission {
    app_tx: UnboundedSender<AppMessage>,
}

impl PromptPermission {
    pub const fn new(app_tx: UnboundedSender<AppMessage>) -> Self {
        Self { app_tx }
    }
}

#[async_trait]
impl PermissionApi for PromptPermission {
    async fn request(&self) -> Permission {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.app_tx.send(AppMessage::PermissionPrompt(reply_tx)).is_err() {
            return Permission::Denied;
        }
        reply_rx.await.unwrap_or(Permission::Denied)
    }
}

/// Answers every request the same way.
pub struct FixedPermission(pub Permission);

#[async_trait]
impl PermissionApi for FixedPermission {
    async fn request(&self) -> Permission {
        self.0
    }
}

/// Position source backed by the configured device coordinate.
pub struct ConfiguredPosition {
    coordinate: Coordinate,
    accuracy: Accuracy,
    delay: Duration,
    failure: Option<String>,
}

impl ConfiguredPosition {
    pub const fn new(coordinate: Coordinate, accuracy: Accuracy) -> Self {
        Self {
            coordinate,
            accuracy,
            delay: Duration::ZERO,
            failure: None,
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn failing(mut self, reason: Option<String>) -> Self {
        self.failure = reason;
        self
    }
}

#[async_trait]
impl PositionApi for ConfiguredPosition {
    async fn current_position(&self) -> Result<Reading, LocationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(reason) = &self.failure {
            debug!("Configured position source fails: {reason}");
            return Err(LocationError::PositionUnavailable(reason.clone()));
        }
        Ok(Reading {
            coordinate: self.coordinate,
            accuracy: self.accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn test_prompt_forwards_the_answer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let prompt = PromptPermission::new(tx);

        let answer = tokio::spawn(async move { prompt.request().await });
        match rx.recv().await {
            Some(AppMessage::PermissionPrompt(reply)) => {
                reply.send(Permission::Granted).unwrap();
            }
            _ => panic!("expected a permission prompt"),
        }
        assert_eq!(answer.await.unwrap(), Permission::Granted);
    }

    #[tokio::test]
    async fn test_dropped_prompt_counts_as_denied() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let prompt = PromptPermission::new(tx);

        let answer = tokio::spawn(async move { prompt.request().await });
        drop(rx.recv().await);
        assert_eq!(answer.await.unwrap(), Permission::Denied);
    }

    #[tokio::test]
    async fn test_configured_position() {
        let here = Coordinate::new(-23.6, -46.66);
        let source = ConfiguredPosition::new(here, Accuracy::Coarse);
        let reading = source.current_position().await.unwrap();
        assert_eq!(reading.coordinate, here);
        assert_eq!(reading.accuracy, Accuracy::Coarse);

        let broken = ConfiguredPosition::new(here, Accuracy::Coarse)
            .failing(Some("GPS signal lost".to_string()));
        assert_eq!(
            broken.current_position().await,
            Err(LocationError::PositionUnavailable("GPS signal lost".to_string()))
        );
    }
}
