//! FortiOS API interaction module
//!
//! This module provides the transport layer for the appliance's REST API:
//! authentication, the HTTP client wrapper, and the CMDB client that the
//! resource kinds are built on.
//!
//! # Module Structure
//!
//! - [`auth`] - API token handling
//! - [`client`] - Main FortiOS client and generic CMDB operations
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use fortios_cmdb::fortios::client::{ClientConfig, FortiClient};
//!
//! async fn example() -> fortios_cmdb::Result<()> {
//!     let config = ClientConfig::new("https://192.0.2.1")?.with_vdom("root");
//!     let client = FortiClient::new(&config)?;
//!     let servers = client.dhcp_servers().list().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
