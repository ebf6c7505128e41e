//! FortiOS Authentication
//!
//! REST API administrators authenticate with a bearer token generated on the
//! appliance (`execute api-user generate-key`). The token is resolved from an
//! explicit value, the environment, or the saved configuration, in that order.

use crate::error::{Error, Result};
use std::fmt;

/// Environment variable holding the REST API token
pub const TOKEN_ENV: &str = "FORTIOS_ACCESS_TOKEN";

/// A validated REST API token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        if !validate_token(token) {
            return Err(Error::Config(
                "API token must be a non-empty string without whitespace".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the token from `FORTIOS_ACCESS_TOKEN`, ignoring empty values
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(TOKEN_ENV).ok()?;
        match Self::new(&value) {
            Ok(token) => Some(token),
            Err(_) => {
                tracing::warn!("Ignoring invalid {} value", TOKEN_ENV);
                None
            }
        }
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(****)")
    }
}

fn validate_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_graphic())
}

/// Pick the effective token (explicit > environment > saved config)
pub fn resolve_token(explicit: Option<&str>, saved: Option<&str>) -> Result<Option<ApiToken>> {
    if let Some(token) = explicit {
        return ApiToken::new(token).map(Some);
    }
    if let Some(token) = ApiToken::from_env() {
        return Ok(Some(token));
    }
    saved.map(ApiToken::new).transpose()
}
