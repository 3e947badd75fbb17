use std::time::Duration;

use quick_listicle_core::extract_domain;
use tracing::{error, warn};

use crate::api::{SaveReply, SiteApiClient, SiteApiError};
use crate::tab::TabSource;

pub const SAVE_LABEL: &str = "Save this site";
pub const SAVING_LABEL: &str = "Saving...";
pub const SAVED_LABEL: &str = "Saved";

/// How long a front end should keep a message on screen.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveButton {
    pub enabled: bool,
    pub label: String,
}

/// State of the popup: the domain it shows, its save button and the last message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    domain_label: String,
    domain: Option<String>,
    button: SaveButton,
    message: Option<Message>,
    pending_label: Option<String>,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new()
    }
}

impl Popup {
    pub fn new() -> Self {
        Self {
            domain_label: "Loading...".to_string(),
            domain: None,
            button: SaveButton {
                enabled: false,
                label: SAVE_LABEL.to_string(),
            },
            message: None,
            pending_label: None,
        }
    }

    pub fn domain_label(&self) -> &str {
        &self.domain_label
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn button(&self) -> &SaveButton {
        &self.button
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Reads the active tab and derives the domain to save.
    ///
    /// The save button only becomes enabled when a domain was extracted.
    pub fn init(&mut self, source: &impl TabSource) {
        let tab = match source.active_tab() {
            Ok(tab) => tab,
            Err(err) => {
                error!(stage = "popup", error = %err, "failed to initialize popup");
                self.domain_label = "Error loading".to_string();
                self.message = Some(Message::error("❌ Extension error"));
                return;
            }
        };

        let Some(url) = tab.url else {
            self.domain_label = "No URL found".to_string();
            self.message = Some(Message::error("❌ Cannot save - no URL detected"));
            return;
        };

        match extract_domain(&url) {
            Ok(domain) => {
                self.domain_label = domain.clone();
                self.domain = Some(domain);
                self.button.enabled = true;
            }
            Err(err) => {
                warn!(stage = "popup", %url, error = %err, "invalid tab url");
                self.domain_label = "Invalid URL".to_string();
                self.message = Some(Message::error("❌ Cannot parse this URL"));
            }
        }
    }

    /// Disables the button and returns the domain to post, if saving is possible.
    pub fn begin_save(&mut self) -> Option<String> {
        if !self.button.enabled {
            return None;
        }
        let domain = self.domain.clone()?;

        self.pending_label = Some(std::mem::replace(
            &mut self.button.label,
            SAVING_LABEL.to_string(),
        ));
        self.button.enabled = false;
        Some(domain)
    }

    /// Applies the reply to a save started with [`Popup::begin_save`].
    ///
    /// Failures restore the button so the user can try again.
    pub fn finish_save(&mut self, result: Result<SaveReply, SiteApiError>) {
        let original_label = self
            .pending_label
            .take()
            .unwrap_or_else(|| SAVE_LABEL.to_string());

        match result {
            Ok(SaveReply::Saved(saved)) => {
                self.message = Some(Message::success(format!(
                    "✅ Saved {} ({} total sites)",
                    saved.domain, saved.total_sites
                )));
                self.button.label = SAVED_LABEL.to_string();
            }
            Ok(SaveReply::Rejected { status, error }) => {
                warn!(stage = "popup", %status, ?error, "save rejected");
                let reason = error.unwrap_or_else(|| "Unknown error".to_string());
                self.message = Some(Message::error(format!("❌ Failed to save: {reason}")));
                self.restore_button(original_label);
            }
            Err(err) => {
                error!(stage = "popup", error = %err, "error saving domain");
                self.message = Some(Message::error("❌ Network error - Check your connection"));
                self.restore_button(original_label);
            }
        }
    }

    /// Runs a full save against the API. Returns `true` when the domain was stored.
    pub async fn save(&mut self, api: &SiteApiClient) -> bool {
        let Some(domain) = self.begin_save() else {
            return false;
        };
        let result = api.add_site(&domain).await;
        let saved = matches!(result, Ok(SaveReply::Saved(_)));
        self.finish_save(result);
        saved
    }

    fn restore_button(&mut self, label: String) {
        self.button.enabled = true;
        self.button.label = label;
    }
}
