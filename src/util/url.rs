use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Failures when vetting a URL for the OS opener.
///
/// Covers parse failures and policy violations: the opener must never be
/// handed a non-HTTP scheme or an internal address.
#[derive(Debug, Error)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL points to a private/internal IP address.
    #[error("Private address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost URL not allowed")]
    Localhost,
}

impl UrlValidationError {
    /// Human-readable message for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            UrlValidationError::InvalidUrl(_) => "Download link is not a valid URL.".to_string(),
            UrlValidationError::UnsupportedScheme(scheme) => {
                format!("Refusing to open a {scheme}: link.")
            }
            UrlValidationError::PrivateIp(_) | UrlValidationError::Localhost => {
                "Download link points at a private address.".to_string()
            }
        }
    }
}

/// Validates a URL before handing it to the OS opener.
///
/// Only http/https URLs pointing at public hosts are allowed; anything else
/// (other schemes, localhost, private IP ranges) is rejected.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        if host == "localhost" {
            return Err(UrlValidationError::Localhost);
        }

        // Strip brackets from IPv6 addresses for parsing
        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // Unique Local (fc00::/7)
            let is_unique_local = (segments[0] & 0xfe00) == 0xfc00;
            // Link-Local (fe80::/10)
            let is_link_local = (segments[0] & 0xffc0) == 0xfe80;
            is_unique_local || is_link_local
        }
    }
}
