use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::location::LocationProvider;
use crate::screen::LocationTicket;

/// Runs one location request cycle, forwarding every state to the App.
pub struct RequestLocationCmd {
    provider: Arc<LocationProvider>,
    ticket: LocationTicket,
}

impl RequestLocationCmd {
    pub const fn new(provider: Arc<LocationProvider>, ticket: LocationTicket) -> Self {
        Self { provider, ticket }
    }
}

#[async_trait]
impl Command for RequestLocationCmd {
    fn name(&self) -> String {
        format!("Locating device (request {})", self.ticket.request)
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let ticket = self.ticket;
        let final_state = self
            .provider
            .request_location(|state| {
                // The app may already be gone; nothing left to update then.
                let _ = app_tx.send(AppMessage::Location {
                    ticket,
                    state: state.clone(),
                });
            })
            .await;
        debug!("Location request {} settled: {final_state:?}", ticket.request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::catalog::REFERENCE_POINT;
    use crate::location::{
        Accuracy, ConfiguredPosition, FixedPermission, LocationState, Permission, Platform,
    };
    use crate::screen::ScreenId;

    #[tokio::test]
    async fn test_forwards_every_transition_with_ticket() {
        let provider = Arc::new(LocationProvider::new(
            Platform::MapCapable,
            Arc::new(FixedPermission(Permission::Granted)),
            Arc::new(ConfiguredPosition::new(REFERENCE_POINT, Accuracy::Balanced)),
            Duration::from_secs(1),
        ));
        let ticket = LocationTicket {
            screen: ScreenId(7),
            request: 3,
        };
        let (tx, mut rx) = mpsc::unbounded_channel();

        Box::new(RequestLocationCmd::new(provider, ticket))
            .execute(tx)
            .await
            .unwrap();

        let mut states = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            match msg {
                AppMessage::Location { ticket: t, state } => {
                    assert_eq!(t, ticket);
                    states.push(state);
                }
                _ => panic!("unexpected message"),
            }
        }
        assert_eq!(states.len(), 3);
        assert_eq!(states[0], LocationState::PermissionPending);
        assert!(states[2].fix().is_some());
    }
}
