//! Input validation for caller-supplied domains and addresses

use std::net::IpAddr;

use crate::error::{Error, Result};

/// Validate a domain name (RFC 1035 label rules, 253 chars max)
pub fn domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::invalid_input("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(Error::invalid_input(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(Error::invalid_input(format!(
            "Domain name must have at least two labels: '{}'",
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_input(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(Error::invalid_input(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::invalid_input(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_input(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// Validate a DNS record name
///
/// Same rules as [`domain_name`], plus an optional leading `*.` wildcard label
/// and an optional trailing dot.
pub fn record_name(name: &str) -> Result<()> {
    let name = name.strip_suffix('.').unwrap_or(name);
    domain_name(name.strip_prefix("*.").unwrap_or(name))
}

/// Parse an IPv4 or IPv6 address, ignoring surrounding whitespace
pub fn ip_address(value: &str) -> Result<IpAddr> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("Not a valid IP address: '{}'", value)))
}
