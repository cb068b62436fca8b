//! Record-name normalization and namespace extraction

use std::fmt::Write;

/// Normalize a domain the way Route 53 reports it in
/// `route53:ChangeResourceRecordSetsNormalizedRecordNames`.
///
/// Lower-cases, drops one trailing dot and escapes every byte outside
/// `[a-z0-9_.-]` as a three digit octal escape (`*` becomes `\052`).
pub fn normalize_domain(domain: &str) -> String {
    let lowered = domain.to_lowercase();
    let trimmed = lowered.strip_suffix('.').unwrap_or(&lowered);

    let mut normalized = String::with_capacity(trimmed.len());
    for byte in trimmed.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'_' | b'.' | b'-')
        {
            normalized.push(char::from(byte));
        } else {
            // Writing to a String cannot fail
            let _ = write!(normalized, "\\{byte:03o}");
        }
    }
    normalized
}

/// Human readable namespace of a domain, used to name roles.
///
/// Removes every `*` and then any leading characters that are not
/// alphanumeric: `*.dev.acme.com` and `*dev*.acme.com` both become
/// `dev.acme.com`.
pub fn extract_namespace_domain(domain: &str) -> String {
    let without_stars: String = domain.chars().filter(|c| *c != '*').collect();
    without_stars
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}
