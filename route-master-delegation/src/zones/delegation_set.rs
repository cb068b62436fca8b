//! Reusable delegation set: one fixed set of four name servers for every zone

use crate::error::{RouteMasterError, RouteMasterResult};
use crate::types::{PlannedResource, Value};

pub const DELEGATION_SET_LOGICAL_ID: &str = "DelegationSet";
const NAME_SERVER_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReusableDelegationSet {
    id: Value,
    name_servers: Vec<Value>,
    request: Option<PlannedResource>,
}

impl ReusableDelegationSet {
    /// Plan a new delegation set. `caller_reference` identifies the request
    /// across retries (e.g. `r53-set-1`); `hosted_zone_id` reuses the name
    /// servers of an existing zone.
    pub fn new(caller_reference: &str, hosted_zone_id: Option<String>) -> Self {
        let name_servers = (0..NAME_SERVER_COUNT)
            .map(|i| {
                Value::attribute(
                    DELEGATION_SET_LOGICAL_ID,
                    format!("DelegationSet.NameServers.{i}"),
                )
            })
            .collect();

        Self {
            id: Value::attribute(DELEGATION_SET_LOGICAL_ID, "DelegationSet.Id"),
            name_servers,
            request: Some(PlannedResource::ReusableDelegationSet {
                logical_id: DELEGATION_SET_LOGICAL_ID.to_string(),
                caller_reference: caller_reference.to_string(),
                hosted_zone_id,
            }),
        }
    }

    /// Use a delegation set that already exists
    pub fn existing(id: &str, name_servers: Vec<String>) -> RouteMasterResult<Self> {
        if name_servers.len() != NAME_SERVER_COUNT {
            return Err(RouteMasterError::config(format!(
                "delegation set {id} must list {NAME_SERVER_COUNT} name servers, got {}",
                name_servers.len()
            )));
        }
        Ok(Self {
            id: Value::literal(id.trim_start_matches("/delegationset/")),
            name_servers: name_servers.into_iter().map(Value::Literal).collect(),
            request: None,
        })
    }

    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn name_servers(&self) -> &[Value] {
        &self.name_servers
    }

    /// The creation request, when the set does not exist yet
    pub fn planned_request(&self) -> Option<&PlannedResource> {
        self.request.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_defers_id_and_name_servers() {
        let set = ReusableDelegationSet::new("r53-set-1", None);
        assert_eq!(
            set.id(),
            &Value::attribute("DelegationSet", "DelegationSet.Id")
        );
        assert_eq!(set.name_servers().len(), 4);
        assert_eq!(
            set.name_servers()[3],
            Value::attribute("DelegationSet", "DelegationSet.NameServers.3")
        );
        assert!(matches!(
            set.planned_request(),
            Some(PlannedResource::ReusableDelegationSet { caller_reference, hosted_zone_id: None, .. })
                if caller_reference == "r53-set-1"
        ));
    }

    #[test]
    fn test_new_set_from_existing_zone() {
        let set = ReusableDelegationSet::new("r53-set-1", Some("Z123".to_string()));
        let json = serde_json::to_value(set.planned_request().unwrap()).unwrap();
        assert_eq!(json["HostedZoneId"], "Z123");
        assert_eq!(json["CallerReference"], "r53-set-1");
    }

    #[test]
    fn test_existing_set_uses_literals() {
        let set = ReusableDelegationSet::existing(
            "/delegationset/N1PA6795SAMPLE",
            (1..=4).map(|i| format!("ns-{i}.awsdns.com")).collect(),
        )
        .unwrap();
        assert_eq!(set.id().as_literal(), Some("N1PA6795SAMPLE"));
        assert_eq!(set.name_servers()[0].as_literal(), Some("ns-1.awsdns.com"));
        assert!(set.planned_request().is_none());
    }

    #[test]
    fn test_existing_set_requires_four_name_servers() {
        let result = ReusableDelegationSet::existing("N1", vec!["ns-1.awsdns.com".to_string()]);
        assert!(matches!(result, Err(RouteMasterError::Config(_))));
    }
}
