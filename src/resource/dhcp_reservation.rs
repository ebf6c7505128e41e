//! DHCP reserved addresses (`system.dhcp/server/<server>/reserved-address`)
//!
//! Reservations live under a parent server, addressed by its key (`skey`).

use super::{require_resource, ResourceDef};
use crate::envelope::{Lookup, WriteResult};
use crate::error::Result;
use crate::fortios::client::FortiClient;
use serde::{Deserialize, Serialize};

const RESOURCE_KEY: &str = "dhcp-reserved-address";

/// One reserved address. `ip` and `mac` are always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DhcpReservedAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "q_origin_key", skip_serializing_if = "Option::is_none")]
    pub q_origin_key: Option<u32>,
    /// `mac` or `option82`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub ip: String,
    pub mac: String,
    /// `assign`, `block` or `reserved`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
}

/// CRUD for reserved addresses of any DHCP server
pub struct DhcpReservations<'a> {
    client: &'a FortiClient,
}

impl<'a> DhcpReservations<'a> {
    pub(crate) fn new(client: &'a FortiClient) -> Self {
        Self { client }
    }

    fn def(&self) -> Result<&'static ResourceDef> {
        require_resource(RESOURCE_KEY)
    }

    fn table_path(&self, def: &ResourceDef, skey: &str) -> Result<String> {
        Ok(self.client.cmdb_path(&def.table(Some(skey))?))
    }

    fn entry_path(&self, def: &ResourceDef, skey: &str, mkey: &str) -> Result<String> {
        self.client.cmdb_entry_path(&def.table(Some(skey))?, mkey)
    }

    /// Reserve an address on server `skey`
    pub async fn create(&self, params: &DhcpReservedAddress, skey: &str) -> Result<WriteResult> {
        let def = self.def()?;
        tracing::info!("Creating {} {} on server {}", def.display_name, params.ip, skey);
        self.client
            .create(def, &self.table_path(def, skey)?, params)
            .await
    }

    pub async fn read(&self, skey: &str, mkey: &str) -> Result<Lookup<DhcpReservedAddress>> {
        let def = self.def()?;
        self.client.read(def, &self.entry_path(def, skey, mkey)?).await
    }

    pub async fn update(
        &self,
        params: &DhcpReservedAddress,
        skey: &str,
        mkey: &str,
    ) -> Result<WriteResult> {
        let def = self.def()?;
        tracing::info!("Updating {} {} on server {}", def.display_name, mkey, skey);
        self.client
            .update(def, &self.entry_path(def, skey, mkey)?, params)
            .await
    }

    pub async fn delete(&self, skey: &str, mkey: &str) -> Result<()> {
        let def = self.def()?;
        tracing::info!("Deleting {} {} on server {}", def.display_name, mkey, skey);
        self.client
            .delete(def, &self.entry_path(def, skey, mkey)?)
            .await
    }

    pub async fn list(&self, skey: &str) -> Result<Vec<DhcpReservedAddress>> {
        let def = self.def()?;
        self.client.list(def, &self.table_path(def, skey)?).await
    }
}
