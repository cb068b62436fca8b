//! Domain pattern classification (pure Rust)
//!
//! Requested domains come in three shapes:
//! - plain subdomains: `dev.acme.com`
//! - wildcard subdomains: `*.dev.acme.com`
//! - embedded-wildcard patterns: `dev*.acme.com`, `*dev*test*.acme.com`
//!
//! [`classify`] sorts a domain into exactly one [`DomainClass`]. The root zone
//! (last two labels) is what the zone registry is keyed by.

pub mod normalize;

use crate::error::{RouteMasterError, RouteMasterResult};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub use normalize::{extract_namespace_domain, normalize_domain};

const WILDCARD_PREFIX: &str = "*.";

fn plain_subdomain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9.-]*[a-z0-9]$").expect("plain subdomain pattern is valid")
    })
}

/// Classification of a requested domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Class", content = "Reason")]
pub enum DomainClass {
    /// `*.dev.acme.com`
    WildcardSubdomain,
    /// `dev*.acme.com`: a `*` anywhere except as the `*.` prefix
    PatternDomain,
    /// `dev.acme.com`
    PlainSubdomain,
    /// No root zone, or characters that cannot form a record name
    Invalid(String),
}

/// Return the root zone (last two labels) of a domain.
///
/// A single trailing dot is ignored, so `acme.com.` and `acme.com` share a zone.
pub fn extract_tld(domain: &str) -> RouteMasterResult<String> {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = trimmed.split('.').collect();

    if labels.len() < 2 {
        return Err(RouteMasterError::invalid_domain(
            domain,
            "input does not contain a valid TLD",
        ));
    }

    let root = &labels[labels.len() - 2..];
    if root.iter().any(|label| label.is_empty()) {
        return Err(RouteMasterError::invalid_domain(
            domain,
            "root zone contains an empty label",
        ));
    }

    Ok(root.join("."))
}

/// Classify a domain into exactly one [`DomainClass`].
///
/// Order matters: the `*.` prefix wins over the generic `*` check, and a
/// domain without a root zone is invalid whatever else it contains.
pub fn classify(domain: &str) -> DomainClass {
    if let Err(RouteMasterError::InvalidDomain { reason, .. }) = extract_tld(domain) {
        return DomainClass::Invalid(reason);
    }

    if domain.starts_with(WILDCARD_PREFIX) {
        return DomainClass::WildcardSubdomain;
    }

    if domain.contains('*') {
        return DomainClass::PatternDomain;
    }

    if plain_subdomain_pattern().is_match(&domain.to_ascii_lowercase()) {
        DomainClass::PlainSubdomain
    } else {
        DomainClass::Invalid(
            "only letters, digits, dots and hyphens are allowed, starting and ending alphanumeric"
                .to_string(),
        )
    }
}

pub fn is_wildcard_subdomain(domain: &str) -> bool {
    classify(domain) == DomainClass::WildcardSubdomain
}

pub fn is_pattern_domain(domain: &str) -> bool {
    classify(domain) == DomainClass::PatternDomain
}

pub fn is_plain_subdomain(domain: &str) -> bool {
    classify(domain) == DomainClass::PlainSubdomain
}
