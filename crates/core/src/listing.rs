use std::fmt::Write as _;

use crate::types::ListSitesResponse;

pub const PAGE_TITLE: &str = "Quick Listicle";
pub const PAGE_HEADING: &str = "List of Interesting Things";
pub const PAGE_INTRO: &str =
    "Here is my priority list of companies that feel extremely high potential";

const DEFAULT_ERROR: &str = "Failed to load sites";
const DEFAULT_NOT_CONFIGURED: &str =
    "The site store is not configured. Set KV_REST_API_URL and KV_REST_API_TOKEN to start saving sites.";

/// Result of the single list fetch performed when the listing loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Pending,
    Response {
        success: bool,
        body: ListSitesResponse,
    },
    Failed(String),
}

/// One rendered row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub name: String,
    pub domain: String,
    pub href: String,
}

impl SiteEntry {
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            name: display_name(&domain),
            href: format!("https://{domain}"),
            domain,
        }
    }
}

/// What the listing shows; a pure function of the fetch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    Loading,
    NotConfigured { message: String },
    Error { message: String },
    Empty,
    Sites(Vec<SiteEntry>),
}

impl ListingView {
    pub fn from_outcome(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Pending => Self::Loading,
            FetchOutcome::Failed(message) => Self::Error { message },
            FetchOutcome::Response { success, body } => Self::from_response(success, body),
        }
    }

    fn from_response(success: bool, body: ListSitesResponse) -> Self {
        if let Some(error) = body.error {
            let message = match body.details {
                Some(details) if !details.is_empty() => format!("{error}: {details}"),
                _ => error,
            };
            return Self::Error { message };
        }
        if !success {
            return Self::Error {
                message: DEFAULT_ERROR.to_string(),
            };
        }
        if !body.backend_connected {
            return Self::NotConfigured {
                message: body
                    .message
                    .unwrap_or_else(|| DEFAULT_NOT_CONFIGURED.to_string()),
            };
        }
        if body.sites.is_empty() {
            return Self::Empty;
        }

        let mut sites = body.sites;
        sites.sort();
        sites.dedup();
        Self::Sites(sites.into_iter().map(SiteEntry::new).collect())
    }
}

/// Formats a domain as a company-style name: first label, first letter uppercased.
pub fn display_name(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or(domain);
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the listing as a standalone HTML page.
pub fn render_html(view: &ListingView) -> String {
    let mut body = String::new();
    match view {
        ListingView::Loading => body.push_str("<p class=\"muted\">Loading...</p>\n"),
        ListingView::NotConfigured { message } => {
            let _ = write!(
                body,
                "<div class=\"panel\">\n<h2>Site store not configured</h2>\n<p>{}</p>\n</div>\n",
                escape_html(message)
            );
        }
        ListingView::Error { message } => {
            let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(message));
        }
        ListingView::Empty => {
            body.push_str("<p class=\"muted\">No sites saved yet.</p>\n");
        }
        ListingView::Sites(entries) => {
            body.push_str("<ul class=\"sites\">\n");
            for entry in entries {
                let _ = write!(
                    body,
                    "<li><span class=\"marker\">&rsaquo;</span><div><div class=\"name\">{}</div>\
                     <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div></li>\n",
                    escape_html(&entry.name),
                    escape_html(&entry.href),
                    escape_html(&entry.domain),
                );
            }
            body.push_str("</ul>\n");
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{PAGE_TITLE}</title>\n\
         <meta name=\"description\" content=\"A collection of websites you want to remember\">\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<main>\n<h1>{PAGE_HEADING}</h1>\n\
         <p class=\"intro\">{PAGE_INTRO}</p>\n{body}</main>\n</body>\n</html>\n"
    )
}

/// Renders the listing for a terminal.
pub fn render_text(view: &ListingView) -> String {
    match view {
        ListingView::Loading => "Loading...\n".to_string(),
        ListingView::NotConfigured { message } => {
            format!("Site store not configured\n{message}\n")
        }
        ListingView::Error { message } => format!("Error: {message}\n"),
        ListingView::Empty => "No sites saved yet.\n".to_string(),
        ListingView::Sites(entries) => {
            let mut out = format!("{PAGE_HEADING}\n\n");
            for entry in entries {
                let _ = writeln!(out, "> {}\n  {}", entry.name, entry.href);
            }
            out
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#fff;margin:0;padding:2rem}\
main{max-width:56rem;margin:0 auto}h1{font-family:Georgia,serif;font-size:3rem;margin-bottom:1rem}\
.intro{color:#374151;margin-bottom:3rem}.muted{color:#6b7280}.error{color:#b91c1c}\
.panel{border:1px solid #fcd34d;background:#fffbeb;padding:1rem;border-radius:.5rem}\
.sites{list-style:none;padding:0}.sites li{display:flex;gap:.75rem;margin-bottom:2rem}\
.marker{color:#9ca3af;font-size:1.25rem}.name{font-weight:600;font-size:1.125rem}\
a{color:#2563eb}";
