//! Global OSPF settings (`router/ospf`)
//!
//! There is exactly one OSPF object per VDOM. It always exists, so it can be
//! read and updated but neither created nor deleted.

use super::{require_resource, ResourceDef, Toggle};
use crate::envelope::{Lookup, WriteResult};
use crate::error::{Error, Result};
use crate::fortios::client::FortiClient;
use serde::{Deserialize, Serialize};

const RESOURCE_KEY: &str = "router-ospf";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouterOspf {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    /// `enable`, `always` or `disable`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_information_originate: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<OspfArea>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network: Vec<OspfNetwork>,
}

/// An OSPF area; `id` is dotted-quad (`0.0.0.0` is the backbone)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OspfArea {
    pub id: String,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nssa_translator_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stub_type: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nssa_default_information_originate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nssa_default_information_originate_metric: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nssa_default_information_originate_metric_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nssa_redistribution: Option<Toggle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<OspfAreaRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub virtual_link: Vec<OspfVirtualLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_list: Vec<OspfFilterList>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OspfAreaRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_status: Option<Toggle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OspfVirtualLink {
    pub name: String,
    pub peer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hello_interval: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OspfFilterList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub list: String,
    /// `in` or `out`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// A `network` statement placing a prefix in an area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OspfNetwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<u32>,
    pub prefix: String,
    pub area: String,
}

/// Read and update the global OSPF object
pub struct RouterOspfSettings<'a> {
    client: &'a FortiClient,
}

impl<'a> RouterOspfSettings<'a> {
    pub(crate) fn new(client: &'a FortiClient) -> Self {
        Self { client }
    }

    fn def(&self) -> Result<&'static ResourceDef> {
        require_resource(RESOURCE_KEY)
    }

    fn path(&self, def: &ResourceDef) -> Result<String> {
        Ok(self.client.cmdb_path(&def.table(None)?))
    }

    /// Always fails; the global object exists on every appliance.
    /// Use [`update`](Self::update) to configure it.
    pub async fn create(&self, _params: &RouterOspf) -> Result<WriteResult> {
        Err(Error::Unsupported(
            "global OSPF settings cannot be created, update them instead",
        ))
    }

    pub async fn read(&self) -> Result<Lookup<RouterOspf>> {
        let def = self.def()?;
        self.client.read(def, &self.path(def)?).await
    }

    pub async fn update(&self, params: &RouterOspf) -> Result<WriteResult> {
        let def = self.def()?;
        tracing::info!("Updating {}", def.display_name);
        self.client.update(def, &self.path(def)?, params).await
    }

    /// No request is sent: the global object cannot be removed.
    // TODO: reset the object to factory defaults once those are modelled here
    pub async fn delete(&self) -> Result<()> {
        tracing::debug!("Ignoring delete of global OSPF settings");
        Ok(())
    }
}
