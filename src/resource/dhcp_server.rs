//! DHCP servers (`system.dhcp/server`)
//!
//! The appliance allows one DHCP server per interface. A create that breaks
//! this rule is rejected with error `-526`, yet the appliance still leaves a
//! half-built server behind, so [`DhcpServers::create`] refuses up front when
//! the interface is already served.

use super::dhcp_reservation::DhcpReservedAddress;
use super::{require_resource, ResourceDef, Toggle};
use crate::envelope::{Lookup, WriteResult};
use crate::error::{Error, Result};
use crate::fortios::client::FortiClient;
use serde::{Deserialize, Serialize};

const RESOURCE_KEY: &str = "dhcp-server";

/// A DHCP server, as sent on create/update and returned on read.
/// Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DhcpServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Toggle>,
    /// Seconds; 0 means unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_acl_default_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forticlient_on_net_status: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ac_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ac1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ac2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ac3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_server1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_server2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_server3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins_server1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins_server2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    /// Interface the server answers on; at most one server per interface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ip_range: Vec<IpRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tftp_server: Vec<TftpServer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<DhcpOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicted_ip_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipsec_lease_hold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_configuration: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_settings_from_fortiipam: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_managed_status: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_update: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_update_override: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_server_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_keyname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns_ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vci_match: Option<Toggle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vci_string: Vec<VciString>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_range: Vec<IpRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved_address: Vec<DhcpReservedAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
}

/// An address pool (`ip-range`) or an excluded block (`exclude-range`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IpRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<u32>,
    pub start_ip: String,
    pub end_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TftpServer {
    pub tftp_server: String,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<String>,
}

/// A custom DHCP option (code plus typed value)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DhcpOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VciString {
    pub vci_string: String,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<String>,
}

/// CRUD for `system.dhcp/server`
pub struct DhcpServers<'a> {
    client: &'a FortiClient,
}

impl<'a> DhcpServers<'a> {
    pub(crate) fn new(client: &'a FortiClient) -> Self {
        Self { client }
    }

    fn def(&self) -> Result<&'static ResourceDef> {
        require_resource(RESOURCE_KEY)
    }

    fn table_path(&self, def: &ResourceDef) -> Result<String> {
        Ok(self.client.cmdb_path(&def.table(None)?))
    }

    fn entry_path(&self, def: &ResourceDef, mkey: &str) -> Result<String> {
        self.client.cmdb_entry_path(&def.table(None)?, mkey)
    }

    /// Create a server. Fails without writing when another server already
    /// serves `params.interface`.
    pub async fn create(&self, params: &DhcpServer) -> Result<WriteResult> {
        let def = self.def()?;

        if let Some(interface) = params.interface.as_deref() {
            if let Some(existing) = self.find_by_interface(interface).await? {
                let id = existing.id.map(|id| id.to_string()).unwrap_or_default();
                return Err(Error::Precondition(format!(
                    "DHCP Server already attached to interface {interface} (server {id})"
                )));
            }
        }

        tracing::info!("Creating {} on {:?}", def.display_name, params.interface);
        self.client
            .create(def, &self.table_path(def)?, params)
            .await
    }

    pub async fn read(&self, mkey: &str) -> Result<Lookup<DhcpServer>> {
        let def = self.def()?;
        self.client.read(def, &self.entry_path(def, mkey)?).await
    }

    /// Update server `mkey`; fails if it cannot be read first or does not exist
    pub async fn update(&self, params: &DhcpServer, mkey: &str) -> Result<WriteResult> {
        let def = self.def()?;

        if let Lookup::NotFound = self.read(mkey).await? {
            return Err(Error::Precondition(format!(
                "{} {mkey} does not exist",
                def.display_name
            )));
        }

        tracing::info!("Updating {} {}", def.display_name, mkey);
        self.client
            .update(def, &self.entry_path(def, mkey)?, params)
            .await
    }

    pub async fn delete(&self, mkey: &str) -> Result<()> {
        let def = self.def()?;
        tracing::info!("Deleting {} {}", def.display_name, mkey);
        self.client.delete(def, &self.entry_path(def, mkey)?).await
    }

    /// Every configured server, in appliance order
    pub async fn list(&self) -> Result<Vec<DhcpServer>> {
        let def = self.def()?;
        self.client.list(def, &self.table_path(def)?).await
    }

    /// The server attached to `interface`, if any
    pub async fn find_by_interface(&self, interface: &str) -> Result<Option<DhcpServer>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|server| server.interface.as_deref() == Some(interface)))
    }
}
