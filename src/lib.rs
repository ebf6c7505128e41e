//! Typed client for the FortiOS CMDB REST API.
//!
//! Covers DHCP servers, their reserved addresses and the global OSPF
//! settings. Every call is a single request/response; failures reported by
//! the appliance come back as [`Error::Api`], and a lookup of a missing
//! object comes back as [`Lookup::NotFound`] rather than an error.

pub mod config;
pub mod envelope;
pub mod error;
pub mod fortios;
pub mod resource;

pub use envelope::{Lookup, WriteResult};
pub use error::{Error, Result};
pub use fortios::auth::ApiToken;
pub use fortios::client::{ClientConfig, FortiClient};
pub use resource::dhcp_reservation::DhcpReservedAddress;
pub use resource::dhcp_server::{DhcpOption, DhcpServer, IpRange};
pub use resource::router_ospf::{OspfArea, OspfNetwork, RouterOspf};
pub use resource::Toggle;
