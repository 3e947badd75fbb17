use thiserror::Error;

/// The browser tab the popup was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    pub url: Option<String>,
}

#[derive(Debug, Error)]
#[error("failed to query the active tab: {0}")]
pub struct TabQueryError(pub String);

/// Source of the active tab, standing in for the browser's tab query.
pub trait TabSource {
    fn active_tab(&self) -> Result<ActiveTab, TabQueryError>;
}

/// Tab source backed by a URL handed in by the caller.
#[derive(Debug, Clone)]
pub struct ProvidedTab {
    url: String,
}

impl ProvidedTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TabSource for ProvidedTab {
    fn active_tab(&self) -> Result<ActiveTab, TabQueryError> {
        let url = self.url.trim();
        Ok(ActiveTab {
            url: (!url.is_empty()).then(|| url.to_string()),
        })
    }
}
