//! FortiOS Client
//!
//! Main client for the CMDB API, combining the HTTP transport with the
//! envelope decoder. Resource-specific clients borrow it.

use super::auth::ApiToken;
use super::http::{escape_path_segment, FortiHttpClient};
use crate::envelope::{self, Lookup, WriteResult};
use crate::error::{Error, Result};
use crate::resource::dhcp_reservation::DhcpReservations;
use crate::resource::dhcp_server::DhcpServers;
use crate::resource::router_ospf::RouterOspfSettings;
use crate::resource::ResourceDef;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Root of every CMDB table
pub const CMDB_ROOT: &str = "/api/v2/cmdb";

/// Connection settings for one appliance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `https://192.0.2.1`
    pub base_url: Url,
    pub token: Option<ApiToken>,
    /// Virtual domain to address; the appliance default is used when unset
    pub vdom: Option<String>,
    /// Accept self-signed certificates
    pub insecure: bool,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            token: None,
            vdom: None,
            insecure: false,
            user_agent: format!("fortios-cmdb/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// Main FortiOS client
#[derive(Clone)]
pub struct FortiClient {
    pub http: FortiHttpClient,
}

impl FortiClient {
    /// Create a new FortiOS client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = FortiHttpClient::new(config)?;
        tracing::debug!("FortiOS client for {}", http.base_url());
        Ok(Self { http })
    }

    pub fn dhcp_servers(&self) -> DhcpServers<'_> {
        DhcpServers::new(self)
    }

    pub fn dhcp_reservations(&self) -> DhcpReservations<'_> {
        DhcpReservations::new(self)
    }

    pub fn router_ospf(&self) -> RouterOspfSettings<'_> {
        RouterOspfSettings::new(self)
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Build the path of a CMDB table, e.g. `system.dhcp/server`
    pub fn cmdb_path(&self, table: &str) -> String {
        format!("{}/{}", CMDB_ROOT, table.trim_matches('/'))
    }

    /// Build the path of one entry in a CMDB table; the key is escaped
    pub fn cmdb_entry_path(&self, table: &str, key: &str) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.cmdb_path(table),
            escape_path_segment(key)?
        ))
    }

    // =========================================================================
    // Generic CMDB operations
    // =========================================================================

    /// POST a new entry
    pub async fn create<P: Serialize>(
        &self,
        def: &ResourceDef,
        path: &str,
        params: &P,
    ) -> Result<WriteResult> {
        let request = serde_json::to_vec(params).map_err(Error::Marshal)?;
        let body = self.http.post(path, request).await?;
        envelope::decode_write(&body, &def.error_codes)
    }

    /// PUT over an existing entry
    pub async fn update<P: Serialize>(
        &self,
        def: &ResourceDef,
        path: &str,
        params: &P,
    ) -> Result<WriteResult> {
        let request = serde_json::to_vec(params).map_err(Error::Marshal)?;
        let body = self.http.put(path, request).await?;
        envelope::decode_write(&body, &def.error_codes)
    }

    /// GET one entry
    pub async fn read<T: DeserializeOwned>(
        &self,
        def: &ResourceDef,
        path: &str,
    ) -> Result<Lookup<T>> {
        let body = self.http.get(path).await?;
        let lookup = envelope::decode_lookup(&body, &def.error_codes)?;
        if !lookup.is_found() {
            tracing::debug!("{} not found at {}", def.display_name, path);
        }
        Ok(lookup)
    }

    /// GET every entry of a table
    pub async fn list<T: DeserializeOwned>(&self, def: &ResourceDef, path: &str) -> Result<Vec<T>> {
        let body = self.http.get(path).await?;
        envelope::decode_list(&body, &def.error_codes)
    }

    /// DELETE one entry
    pub async fn delete(&self, def: &ResourceDef, path: &str) -> Result<()> {
        let body = self.http.delete(path).await?;
        envelope::decode_delete(&body, &def.error_codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FortiClient {
        FortiClient::new(&ClientConfig::new("https://192.0.2.1").unwrap()).unwrap()
    }

    #[test]
    fn test_cmdb_paths() {
        let client = client();
        assert_eq!(
            client.cmdb_path("system.dhcp/server"),
            "/api/v2/cmdb/system.dhcp/server"
        );
        assert_eq!(
            client.cmdb_entry_path("system.dhcp/server", "a b").unwrap(),
            "/api/v2/cmdb/system.dhcp/server/a%20b"
        );
        assert!(client.cmdb_entry_path("system.dhcp/server", "..").is_err());
    }

    #[test]
    fn test_config_rejects_non_http_scheme() {
        assert!(ClientConfig::new("ftp://192.0.2.1").is_err());
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new("https://fw.example.net")
            .unwrap()
            .with_vdom("root")
            .insecure(true);
        assert_eq!(config.vdom.as_deref(), Some("root"));
        assert!(config.insecure);
        assert!(config.user_agent.starts_with("fortios-cmdb/"));
    }
}
