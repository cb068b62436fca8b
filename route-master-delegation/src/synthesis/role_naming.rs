//! Role and policy naming for domain batches

use crate::domain::extract_namespace_domain;
use crate::error::{RouteMasterError, RouteMasterResult};

pub const ROLE_PREFIX: &str = "R53-";
pub const POLICY_PREFIX: &str = "R53Policy-";
/// Appended when a role covers more than one domain
pub const MULTI_ZONE_SUFFIX: &str = "-MtplZn";

const MAX_ROLE_NAME_LEN: usize = 64;
const MAX_POLICY_NAME_LEN: usize = 128;

fn namespace_with_suffix<S: AsRef<str>>(domains: &[S]) -> RouteMasterResult<String> {
    let first = domains.first().ok_or(RouteMasterError::EmptyDomainList)?;
    let suffix = if domains.len() > 1 {
        MULTI_ZONE_SUFFIX
    } else {
        ""
    };
    Ok(format!(
        "{}{}",
        extract_namespace_domain(first.as_ref()),
        suffix
    ))
}

/// `R53-{namespace of first domain}[-MtplZn]`
pub fn role_name<S: AsRef<str>>(domains: &[S]) -> RouteMasterResult<String> {
    let name = format!("{ROLE_PREFIX}{}", namespace_with_suffix(domains)?);
    validate_iam_name(&name, MAX_ROLE_NAME_LEN)?;
    Ok(name)
}

/// `R53Policy-{namespace of first domain}[-MtplZn]`
pub fn policy_name<S: AsRef<str>>(domains: &[S]) -> RouteMasterResult<String> {
    let name = format!("{POLICY_PREFIX}{}", namespace_with_suffix(domains)?);
    validate_iam_name(&name, MAX_POLICY_NAME_LEN)?;
    Ok(name)
}

/// IAM names allow `[A-Za-z0-9+=,.@_-]`
fn validate_iam_name(name: &str, max_len: usize) -> RouteMasterResult<()> {
    if name.len() > max_len {
        return Err(RouteMasterError::InvalidRoleName {
            name: name.to_string(),
            reason: format!("longer than {max_len} characters"),
        });
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "+=,.@_-".contains(*c)))
    {
        return Err(RouteMasterError::InvalidRoleName {
            name: name.to_string(),
            reason: format!("character '{c}' is not allowed"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_domain_role_name() {
        assert_eq!(role_name(&["*.dev.acme.com"]).unwrap(), "R53-dev.acme.com");
        assert_eq!(role_name(&["dev*.acme.com"]).unwrap(), "R53-dev.acme.com");
        assert_eq!(role_name(&["dev.acme.com"]).unwrap(), "R53-dev.acme.com");
        assert_eq!(
            role_name(&["*dev*test*.acme.com"]).unwrap(),
            "R53-devtest.acme.com"
        );
    }

    #[test]
    fn test_multi_domain_role_name_uses_first_domain() {
        assert_eq!(
            role_name(&["*.dev.acme.com", "test.example.com"]).unwrap(),
            "R53-dev.acme.com-MtplZn"
        );
    }

    #[test]
    fn test_policy_name() {
        assert_eq!(policy_name(&["example.com"]).unwrap(), "R53Policy-example.com");
        assert_eq!(
            policy_name(&["dev.acme.com", "*dev.example.com"]).unwrap(),
            "R53Policy-dev.acme.com-MtplZn"
        );
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            role_name(&empty),
            Err(RouteMasterError::EmptyDomainList)
        ));
    }

    #[test]
    fn test_role_name_length_limit() {
        let long = format!("{}.acme.com", "a".repeat(60));
        match role_name(&[long.as_str()]) {
            Err(RouteMasterError::InvalidRoleName { reason, .. }) => {
                assert!(reason.contains("64"));
            }
            other => panic!("Expected InvalidRoleName, got {:?}", other),
        }
    }

    #[test]
    fn test_role_name_rejects_disallowed_characters() {
        assert!(matches!(
            role_name(&["dev?.acme.com"]),
            Err(RouteMasterError::InvalidRoleName { .. })
        ));
    }
}
