//! Device location.
//!
//! The [`LocationProvider`] walks a request through the permission check and
//! the position read, reporting each [`LocationState`] it passes through.
//! The platform capability is decided once at startup; on a [`Platform::Static`]
//! platform the provider fails immediately without prompting.

mod device;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Coordinate;

pub use device::{ConfiguredPosition, FixedPermission, PromptPermission};

/// What the host can do, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Location and map rendering are available.
    MapCapable,
    /// No location or map support; a static placeholder is shown instead.
    Static,
}

impl Platform {
    pub const fn from_map_support(map: bool) -> Self {
        if map { Self::MapCapable } else { Self::Static }
    }

    pub const fn supports_map(self) -> bool {
        matches!(self, Self::MapCapable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    Coarse,
    #[default]
    Balanced,
    High,
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Coarse => "coarse",
            Self::Balanced => "balanced",
            Self::High => "high",
        };
        write!(f, "{label}")
    }
}

/// A raw answer from the position API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub coordinate: Coordinate,
    pub accuracy: Accuracy,
}

/// A resolved device location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub accuracy: Accuracy,
    pub obtained_at: DateTime<Local>,
}

impl From<Reading> for LocationFix {
    fn from(reading: Reading) -> Self {
        Self {
            coordinate: reading.coordinate,
            accuracy: reading.accuracy,
            obtained_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("unsupported platform")]
    UnsupportedPlatform,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("timed out waiting for a position")]
    Timeout,
}

impl LocationError {
    /// Whether a manual refresh can change the outcome.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnsupportedPlatform)
    }
}

/// Where a location request currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Unrequested,
    PermissionPending,
    Fetching,
    Available(LocationFix),
    Error(LocationError),
}

impl LocationState {
    /// Whether a request is in flight.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PermissionPending | Self::Fetching)
    }

    pub const fn fix(&self) -> Option<&LocationFix> {
        match self {
            Self::Available(fix) => Some(fix),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Granted,
    Denied,
}

/// Asks the user for permission to read the device location.
#[async_trait]
pub trait PermissionApi: Send + Sync {
    async fn request(&self) -> Permission;
}

/// Reads the current device position.
#[async_trait]
pub trait PositionApi: Send + Sync {
    async fn current_position(&self) -> Result<Reading, LocationError>;
}

pub struct LocationProvider {
    platform: Platform,
    permissions: Arc<dyn PermissionApi>,
    position: Arc<dyn PositionApi>,
    timeout: Duration,
}

impl LocationProvider {
    pub fn new(
        platform: Platform,
        permissions: Arc<dyn PermissionApi>,
        position: Arc<dyn PositionApi>,
        timeout: Duration,
    ) -> Self {
        Self {
            platform,
            permissions,
            position,
            timeout,
        }
    }

    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Run one request cycle.
    ///
    /// `on_transition` sees every state entered, including the final one,
    /// which is also returned. Permission is asked again on every call.
    pub async fn request_location<F>(&self, mut on_transition: F) -> LocationState
    where
        F: FnMut(&LocationState) + Send,
    {
        if !self.platform.supports_map() {
            debug!("Location requested on a static platform");
            let state = LocationState::Error(LocationError::UnsupportedPlatform);
            on_transition(&state);
            return state;
        }

        on_transition(&LocationState::PermissionPending);
        if self.permissions.request().await == Permission::Denied {
            info!("Location permission denied");
            let state = LocationState::Error(LocationError::PermissionDenied);
            on_transition(&state);
            return state;
        }

        on_transition(&LocationState::Fetching);
        let state = match tokio::time::timeout(self.timeout, self.position.current_position()).await
        {
            Ok(Ok(reading)) => {
                info!(
                    "Location fix at {} ({} accuracy)",
                    reading.coordinate, reading.accuracy
                );
                LocationState::Available(reading.into())
            }
            Ok(Err(error)) => {
                warn!("Position read failed: {error}");
                LocationState::Error(error)
            }
            Err(_) => {
                warn!("Position read timed out after {:?}", self.timeout);
                LocationState::Error(LocationError::Timeout)
            }
        };
        on_transition(&state);
        state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingPermission {
        answer: Permission,
        prompts: AtomicUsize,
    }

    impl CountingPermission {
        fn new(answer: Permission) -> Arc<Self> {
            Arc::new(Self {
                answer,
                prompts: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PermissionApi for CountingPermission {
        async fn request(&self) -> Permission {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    struct StaticPosition(Result<Reading, LocationError>);

    #[async_trait]
    impl PositionApi for StaticPosition {
        async fn current_position(&self) -> Result<Reading, LocationError> {
            self.0.clone()
        }
    }

    struct HangingPosition;

    #[async_trait]
    impl PositionApi for HangingPosition {
        async fn current_position(&self) -> Result<Reading, LocationError> {
            std::future::pending().await
        }
    }

    fn reading() -> Reading {
        Reading {
            coordinate: Coordinate::new(-23.6, -46.66),
            accuracy: Accuracy::High,
        }
    }

    fn provider(
        platform: Platform,
        permissions: Arc<CountingPermission>,
        position: Arc<dyn PositionApi>,
    ) -> LocationProvider {
        LocationProvider::new(
            platform,
            permissions,
            position,
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_static_platform_short_circuits_without_prompt() {
        let permissions = CountingPermission::new(Permission::Granted);
        let provider = provider(
            Platform::Static,
            permissions.clone(),
            Arc::new(StaticPosition(Ok(reading()))),
        );

        let mut seen = Vec::new();
        let state = provider.request_location(|s| seen.push(s.clone())).await;

        assert_eq!(
            state,
            LocationState::Error(LocationError::UnsupportedPlatform)
        );
        assert_eq!(seen, vec![state]);
        assert_eq!(permissions.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_granted_request_walks_every_state() {
        let permissions = CountingPermission::new(Permission::Granted);
        let provider = provider(
            Platform::MapCapable,
            permissions.clone(),
            Arc::new(StaticPosition(Ok(reading()))),
        );

        let mut seen = Vec::new();
        let state = provider.request_location(|s| seen.push(s.clone())).await;

        let fix = state.fix().expect("fix");
        assert_eq!(fix.coordinate, reading().coordinate);
        assert_eq!(fix.accuracy, Accuracy::High);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], LocationState::PermissionPending);
        assert_eq!(seen[1], LocationState::Fetching);
        assert!(matches!(seen[2], LocationState::Available(_)));
        assert_eq!(permissions.prompts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_permission_skips_position_read() {
        let permissions = CountingPermission::new(Permission::Denied);
        let provider = provider(
            Platform::MapCapable,
            permissions,
            Arc::new(HangingPosition),
        );

        let mut seen = Vec::new();
        let state = provider.request_location(|s| seen.push(s.clone())).await;

        assert_eq!(state, LocationState::Error(LocationError::PermissionDenied));
        assert!(!seen.contains(&LocationState::Fetching));
    }

    #[tokio::test]
    async fn test_position_failure_surfaces_reason() {
        let permissions = CountingPermission::new(Permission::Granted);
        let provider = provider(
            Platform::MapCapable,
            permissions,
            Arc::new(StaticPosition(Err(LocationError::PositionUnavailable(
                "no signal".to_string(),
            )))),
        );

        let state = provider.request_location(|_| {}).await;
        assert_eq!(
            state,
            LocationState::Error(LocationError::PositionUnavailable("no signal".to_string()))
        );
    }

    #[tokio::test]
    async fn test_hanging_position_times_out() {
        let permissions = CountingPermission::new(Permission::Granted);
        let provider = provider(Platform::MapCapable, permissions, Arc::new(HangingPosition));

        let state = provider.request_location(|_| {}).await;
        assert_eq!(state, LocationState::Error(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_permission_is_asked_on_every_refresh() {
        let permissions = CountingPermission::new(Permission::Granted);
        let provider = provider(
            Platform::MapCapable,
            permissions.clone(),
            Arc::new(StaticPosition(Ok(reading()))),
        );

        provider.request_location(|_| {}).await;
        provider.request_location(|_| {}).await;
        assert_eq!(permissions.prompts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_only_unsupported_platform_is_final() {
        assert!(!LocationError::UnsupportedPlatform.is_retryable());
        assert!(LocationError::PermissionDenied.is_retryable());
        assert!(LocationError::Timeout.is_retryable());
    }
}
