use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::ui::ToastType;

const MESSAGING_URL: &str = "https://wa.me/";

/// Booking request handed to an external messaging app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    service_name: String,
    price: u32,
}

impl MessageDraft {
    pub fn new(service_name: impl Into<String>, price: u32) -> Self {
        Self {
            service_name: service_name.into(),
            price,
        }
    }

    pub fn text(&self) -> String {
        format!(
            "Hello! I would like to book {} for R$ {}.",
            self.service_name, self.price
        )
    }

    /// Link that opens the messaging app with the text prefilled.
    pub fn link(&self) -> String {
        format!(
            "{MESSAGING_URL}?text={}",
            utf8_percent_encode(&self.text(), NON_ALPHANUMERIC)
        )
    }
}

/// Copies the draft's link to the clipboard and confirms with a toast.
pub struct HandoffCmd {
    draft: MessageDraft,
}

impl HandoffCmd {
    pub const fn new(draft: MessageDraft) -> Self {
        Self { draft }
    }
}

#[async_trait]
impl Command for HandoffCmd {
    fn name(&self) -> String {
        format!("Handing off booking of {}", self.draft.service_name)
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let link = self.draft.link();
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(link.clone())?;
        info!("Copied messaging link {link}");
        app_tx.send(AppMessage::ShowToast {
            message: "Booking link copied, paste it in your messaging app".to_string(),
            toast_type: ToastType::Success,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_mentions_service_and_price() {
        let draft = MessageDraft::new("Pintor de Muros", 250);
        assert_eq!(
            draft.text(),
            "Hello! I would like to book Pintor de Muros for R$ 250."
        );
    }

    #[test]
    fn test_link_is_percent_encoded() {
        let link = MessageDraft::new("Varredor Calçada", 80).link();
        assert!(link.starts_with("https://wa.me/?text=Hello%21%20I"));
        assert!(link.contains("Cal%C3%A7ada"));
        assert!(link.ends_with("R%24%2080%2E"));
        assert!(!link[MESSAGING_URL.len()..].contains(' '));
    }
}
