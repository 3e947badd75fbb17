//! Domain rules shared by the site store service and the popup client.
//!
//! `domain` turns tab URLs into stored domains and validates submitted ones,
//! `types` holds the `/api/sites` wire format and `listing` derives what the
//! listing shows from a single list fetch.

pub mod domain;
pub mod listing;
pub mod types;

pub use domain::{extract_domain, validate_domain, DomainError, ExtractError};
pub use listing::{FetchOutcome, ListingView, SiteEntry};
pub use types::{AddSiteRequest, AddSiteResponse, ErrorBody, ListSitesResponse, SITES_KEY};
