//! Popup side of Quick Listicle: reads the active tab, extracts its domain and
//! posts it to the site store API.

pub mod api;
pub mod popup;
pub mod tab;

pub use api::{SaveReply, SiteApiClient, SiteApiError, DEFAULT_API_URL};
pub use popup::{Message, MessageKind, Popup, SaveButton, MESSAGE_TTL};
pub use tab::{ActiveTab, ProvidedTab, TabQueryError, TabSource};
