//! Error type shared by every CMDB operation.

use crate::fortios::http::http_status_description;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything a CMDB call can fail with.
///
/// A lookup that hits HTTP 404 is *not* an error; it is reported as
/// [`Lookup::NotFound`](crate::envelope::Lookup::NotFound).
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response.
    #[error("cannot send request: {0}")]
    Send(#[source] reqwest::Error),

    /// A response arrived but its body could not be read.
    #[error("cannot get response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The body is not a usable envelope, or its payload does not fit the
    /// expected shape.
    #[error("cannot get the right response: {0}")]
    Malformed(String),

    #[error("cannot get status from the response")]
    MissingStatus,

    #[error("cannot get http_status from the response")]
    MissingHttpStatus,

    /// The appliance answered with a non-success status.
    #[error("{message}, {}", http_detail(.http_status))]
    Api {
        status: String,
        code: Option<i64>,
        http_status: Option<u16>,
        message: String,
    },

    /// A caller-side conflict detected before any write was issued.
    #[error("{0}")]
    Precondition(String),

    /// The parameters could not be serialized.
    #[error("cannot serialize request body: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("{0}")]
    Unsupported(&'static str),

    #[error("unknown CMDB resource: {0}")]
    UnknownResource(String),

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Numeric appliance error code, for [`Error::Api`] failures that carried one.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Send(_) | Self::Body(_))
    }
}

fn http_detail(http_status: &Option<u16>) -> String {
    match http_status {
        Some(code) => format!("details: {}", http_status_description(*code)),
        None => "and http_status no is not found".to_string(),
    }
}
