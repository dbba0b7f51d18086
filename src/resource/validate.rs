//! Field validators mirroring the backend's rules.
//!
//! These run client side so a form can refuse submission before a round
//! trip; the backend re-validates everything.

/// Record names: ASCII letters and digits plus `- _ . ~`.
pub fn is_name_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

pub fn is_email_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'+'))
        && is_domain_valid(domain, false)
}

/// Validates a DNS name. With `allow_wildcard`, a single leading `*.`
/// label is accepted.
pub fn is_domain_valid(domain: &str, allow_wildcard: bool) -> bool {
    let domain = match domain.strip_prefix("*.") {
        Some(rest) if allow_wildcard => rest,
        Some(_) => return false,
        None => domain,
    };

    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2 && labels.iter().copied().all(is_label_valid)
}

fn is_label_valid(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

pub fn is_port_valid(port: i64) -> bool {
    (1..=65535).contains(&port)
}

/// Dotted-decimal OID, e.g. `1.3.6.1.4.1.311`.
pub fn is_oid_valid(oid: &str) -> bool {
    !oid.is_empty()
        && oid
            .split('.')
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()))
}

/// ACME directory and webhook endpoints must be absolute https URLs.
pub fn is_https_url_valid(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.scheme() == "https" && parsed.has_host(),
        Err(_) => false,
    }
}
