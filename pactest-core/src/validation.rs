//! Input checks applied before a PAC is stored or evaluated.
//!
//! These are purely syntactic: a host that passes is well-formed, not
//! necessarily resolvable.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PacError, Result};

const MAX_HOSTNAME_LEN: usize = 253;

static HOSTNAME_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("hostname label pattern is valid")
});

/// Accepts an RFC 1123 hostname or an IP literal (IPv6 optionally bracketed).
pub fn validate_dest_host(value: &str) -> Result<()> {
    if parse_ip_literal(value).is_some() {
        return Ok(());
    }

    let host = value.strip_suffix('.').unwrap_or(value);
    let well_formed = !host.is_empty()
        && host.len() <= MAX_HOSTNAME_LEN
        && host.split('.').all(|label| HOSTNAME_LABEL.is_match(label));

    if well_formed {
        Ok(())
    } else {
        Err(PacError::Validation(
            "\"dest_host\" must be a valid hostname or IP address".to_string(),
        ))
    }
}

/// Accepts a bare IPv4 or IPv6 address.
pub fn validate_src_ip(value: &str) -> Result<IpAddr> {
    value.parse::<IpAddr>().map_err(|_| {
        PacError::Validation("\"src_ip\" must be a valid IP address".to_string())
    })
}

pub fn validate_pac_content(content: &str) -> Result<()> {
    if content.is_empty() {
        Err(PacError::Validation(
            "The 'content' field must not be empty".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn parse_ip_literal(value: &str) -> Option<IpAddr> {
    let unbracketed = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(value);
    unbracketed.parse().ok()
}
