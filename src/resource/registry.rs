//! Resource Registry - Load CMDB resource definitions from JSON
//!
//! Table paths and the error codes each table is known to report are data,
//! embedded at compile time and looked up by key.

use super::ResourceDef;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Table definitions, one file per CMDB area
const RESOURCE_FILES: &[(&str, &str)] = &[
    ("dhcp.json", include_str!("../resources/dhcp.json")),
    ("router.json", include_str!("../resources/router.json")),
];

/// Root structure of resources/*.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

impl ResourceConfig {
    /// Merge one definitions file; a key defined twice is a build mistake
    fn merge(&mut self, file: &str, content: &str) -> std::result::Result<(), String> {
        let parsed: ResourceConfig =
            serde_json::from_str(content).map_err(|e| format!("{file}: {e}"))?;

        for (key, def) in parsed.resources {
            if def.singleton && def.is_nested() {
                return Err(format!("{file}: singleton '{key}' cannot have a parent key"));
            }
            if self.resources.insert(key.clone(), def).is_some() {
                return Err(format!("{file}: '{key}' is defined twice"));
            }
        }
        Ok(())
    }
}

static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// The definitions compiled into the crate, parsed on first use
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut registry = ResourceConfig::default();
        for (file, content) in RESOURCE_FILES {
            if let Err(e) = registry.merge(file, content) {
                panic!("invalid embedded resource definitions: {e}");
            }
        }
        registry
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Like [`get_resource`], for callers that need the definition to exist
pub fn require_resource(key: &str) -> Result<&'static ResourceDef> {
    get_resource(key).ok_or_else(|| Error::UnknownResource(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = ResourceConfig::default();
        let file = r#"{"resources": {"x": {"display_name": "X", "path": "a/b"}}}"#;
        registry.merge("one.json", file).unwrap();
        let err = registry.merge("two.json", file).unwrap_err();
        assert_eq!(err, "two.json: 'x' is defined twice");
    }

    #[test]
    fn test_nested_singleton_rejected() {
        let file = r#"{"resources": {"x": {"display_name": "X", "path": "a/{skey}/b", "singleton": true}}}"#;
        assert!(ResourceConfig::default().merge("x.json", file).is_err());
    }

    #[test]
    fn test_dhcp_server_resource_exists() {
        let resource = get_resource("dhcp-server").expect("dhcp-server should be registered");
        assert_eq!(resource.display_name, "DHCP server");
        assert_eq!(resource.path, "system.dhcp/server");
        assert_eq!(
            resource.error_codes.get(&-526).map(String::as_str),
            Some("DHCP Server already attached to interface")
        );
        assert!(!resource.singleton);
    }

    #[test]
    fn test_reserved_address_codes() {
        let resource = get_resource("dhcp-reserved-address").unwrap();
        for code in [-3, -8, -15, -526] {
            assert!(resource.error_codes.contains_key(&code), "missing code {code}");
        }
        assert_eq!(
            resource.error_codes.get(&-15).map(String::as_str),
            Some("IP or MAC already assigned to reservation, -15")
        );
    }

    #[test]
    fn test_ospf_is_singleton_without_codes() {
        let resource = get_resource("router-ospf").unwrap();
        assert!(resource.singleton);
        assert!(resource.error_codes.is_empty());
    }

    #[test]
    fn test_every_embedded_resource_loads() {
        let mut keys: Vec<&str> = get_registry().resources.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["dhcp-reserved-address", "dhcp-server", "router-ospf"]);
    }

    #[test]
    fn test_require_unknown_resource() {
        assert!(matches!(
            require_resource("firewall-policy"),
            Err(Error::UnknownResource(_))
        ));
    }
}
