//! Record-name match sets for `route53:ChangeResourceRecordSets` conditions
//!
//! Route 53 compares `ChangeResourceRecordSetsNormalizedRecordNames` against its
//! own octal-escaped, lower-case record names, so exact matches are
//! pre-normalized while `StringLike` globs keep the raw `*` and are only
//! lower-cased.

use crate::domain::{classify, normalize_domain, DomainClass};
use crate::error::{RouteMasterError, RouteMasterResult};
use log::trace;
use serde::Serialize;

/// Values for the `StringEquals` and `StringLike` conditions, in insertion order.
/// Duplicates across domains are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchSets {
    pub string_equals: Vec<String>,
    pub string_like: Vec<String>,
}

impl MatchSets {
    /// Classify one domain and append its match strings
    pub fn add_domain(&mut self, domain: &str) -> RouteMasterResult<DomainClass> {
        let class = classify(domain);
        let glob = domain.to_ascii_lowercase();
        match &class {
            DomainClass::WildcardSubdomain => {
                // The record `*.dev.acme.com` itself, then the name it hangs off
                self.string_equals.push(normalize_domain(domain));
                if let Some(base) = domain.strip_prefix("*.") {
                    self.string_equals.push(normalize_domain(base));
                }
                self.string_like.push(glob);
            }
            DomainClass::PatternDomain => {
                // A partial glob has no exact form
                self.string_like.push(glob);
            }
            DomainClass::PlainSubdomain => {
                let wildcard = format!("*.{glob}");
                self.string_equals.push(normalize_domain(&wildcard));
                self.string_equals.push(normalize_domain(domain));
                self.string_like.push(wildcard);
            }
            DomainClass::Invalid(reason) => {
                return Err(RouteMasterError::invalid_domain(domain, reason.clone()));
            }
        }
        trace!("{} classified as {:?}", domain, class);
        Ok(class)
    }
}

/// Build match sets for a batch. The first invalid domain aborts the batch.
pub fn build_match_sets<S: AsRef<str>>(domains: &[S]) -> RouteMasterResult<MatchSets> {
    let mut sets = MatchSets::default();
    for domain in domains {
        sets.add_domain(domain.as_ref())?;
    }
    Ok(sets)
}
