//! CMDB resource kinds
//!
//! Each resource kind pairs typed parameters with a table definition loaded
//! from the registry. The definition carries the table path and the error
//! codes the appliance is known to report for it; all request and envelope
//! handling is shared through [`FortiClient`](crate::fortios::client::FortiClient).
//!
//! # Module Structure
//!
//! - [`registry`] - Loads resource definitions from embedded JSON
//! - [`dhcp_server`] - `system.dhcp/server`
//! - [`dhcp_reservation`] - `system.dhcp/server/<server>/reserved-address`
//! - [`router_ospf`] - `router/ospf` (global singleton)
//!
//! # Example
//!
//! ```ignore
//! use fortios_cmdb::{ClientConfig, FortiClient, Lookup};
//!
//! async fn example() -> fortios_cmdb::Result<()> {
//!     let client = FortiClient::new(&ClientConfig::new("https://192.0.2.1")?)?;
//!     if let Lookup::Found(server) = client.dhcp_servers().read("1").await? {
//!         println!("{:?}", server.interface);
//!     }
//!     Ok(())
//! }
//! ```

pub mod dhcp_reservation;
pub mod dhcp_server;
pub mod registry;
pub mod router_ospf;

use crate::envelope::ErrorCodes;
use crate::error::Result;
use crate::fortios::http::escape_path_segment;
use serde::{Deserialize, Serialize};

pub use registry::{get_resource, require_resource};

/// Placeholder for the parent key in nested table paths
const PARENT_KEY: &str = "{skey}";

/// The `enable`/`disable` flag most CMDB attributes use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Enable,
    Disable,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Table path below `/api/v2/cmdb`; nested tables contain `{skey}`
    pub path: String,
    #[serde(default)]
    pub error_codes: ErrorCodes,
    /// A single global object rather than a table of entries
    #[serde(default)]
    pub singleton: bool,
}

impl ResourceDef {
    /// Table path with the parent key (if any) escaped into place
    pub fn table(&self, parent: Option<&str>) -> Result<String> {
        match parent {
            Some(skey) => Ok(self.path.replace(PARENT_KEY, &escape_path_segment(skey)?)),
            None => Ok(self.path.clone()),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.path.contains(PARENT_KEY)
    }
}
