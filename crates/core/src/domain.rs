use thiserror::Error;
use url::Url;

const WWW_PREFIX: &str = "www.";

/// Errors raised while turning a tab URL into a domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("failed to parse url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("url has no host: {0}")]
    MissingHost(String),
}

/// Errors raised while validating a domain submitted to the site store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Domain is required")]
    Missing,
    #[error("Invalid domain format")]
    InvalidFormat,
}

/// Extracts the normalized domain from an absolute URL.
///
/// The host is taken as serialized by the URL parser (ASCII lowercase,
/// punycode for internationalized names) and a single leading `www.` is
/// removed.
///
/// ```
/// use quick_listicle_core::domain::extract_domain;
///
/// assert_eq!(extract_domain("https://www.example.com/path").unwrap(), "example.com");
/// assert!(extract_domain("not a url").is_err());
/// ```
pub fn extract_domain(raw: &str) -> Result<String, ExtractError> {
    let url = Url::parse(raw)?;
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| ExtractError::MissingHost(raw.to_string()))?;

    let domain = host.strip_prefix(WWW_PREFIX).unwrap_or(host);
    if domain.is_empty() {
        return Err(ExtractError::MissingHost(raw.to_string()));
    }
    Ok(domain.to_string())
}

/// Validates a domain received over the API.
///
/// The check is loose: the value must be non-empty and
/// `https://{domain}` must parse as a URL with a host. The domain is
/// returned unchanged.
pub fn validate_domain(domain: &str) -> Result<&str, DomainError> {
    if domain.is_empty() {
        return Err(DomainError::Missing);
    }

    let url = Url::parse(&format!("https://{domain}")).map_err(|_| DomainError::InvalidFormat)?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(domain),
        _ => Err(DomainError::InvalidFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_www_prefix() {
        assert_eq!(
            extract_domain("https://www.example.com/path").expect("extract"),
            "example.com"
        );
        assert_eq!(
            extract_domain("https://www.www.example.com/").expect("extract"),
            "www.example.com"
        );
    }

    #[test]
    fn keeps_other_subdomains_and_drops_port() {
        assert_eq!(
            extract_domain("http://docs.rs:8080/url/latest?q=1#frag").expect("extract"),
            "docs.rs"
        );
        assert_eq!(
            extract_domain("https://news.ycombinator.com").expect("extract"),
            "news.ycombinator.com"
        );
    }

    #[test]
    fn lowercases_and_encodes_hosts() {
        assert_eq!(
            extract_domain("HTTPS://WWW.Example.COM/").expect("extract"),
            "example.com"
        );
        assert_eq!(
            extract_domain("https://bücher.example/").expect("extract"),
            "xn--bcher-kva.example"
        );
    }

    #[test]
    fn www_must_be_a_prefix_label() {
        assert_eq!(
            extract_domain("https://wwwexample.com/").expect("extract"),
            "wwwexample.com"
        );
    }

    #[test]
    fn malformed_input_fails() {
        assert!(matches!(
            extract_domain("not a url"),
            Err(ExtractError::InvalidUrl(_))
        ));
        assert!(extract_domain("").is_err());
    }

    #[test]
    fn urls_without_host_fail() {
        assert!(matches!(
            extract_domain("about:blank"),
            Err(ExtractError::MissingHost(_))
        ));
        assert!(matches!(
            extract_domain("data:text/plain,hello"),
            Err(ExtractError::MissingHost(_))
        ));
    }

    #[test]
    fn bare_www_host_fails() {
        assert!(matches!(
            extract_domain("https://www./"),
            Err(ExtractError::MissingHost(_))
        ));
        assert!(matches!(
            extract_domain("http://WWW.:8080/path"),
            Err(ExtractError::MissingHost(_))
        ));
    }

    #[test]
    fn validate_accepts_plain_hosts() {
        assert_eq!(validate_domain("openai.com"), Ok("openai.com"));
        assert_eq!(validate_domain("localhost"), Ok("localhost"));
        assert_eq!(validate_domain("Example.COM"), Ok("Example.COM"));
    }

    #[test]
    fn validate_rejects_empty_and_malformed() {
        assert_eq!(validate_domain(""), Err(DomainError::Missing));
        assert_eq!(validate_domain("exa mple.com"), Err(DomainError::InvalidFormat));
        assert_eq!(validate_domain("bad<host"), Err(DomainError::InvalidFormat));
        assert_eq!(validate_domain("host:notaport"), Err(DomainError::InvalidFormat));
    }
}
