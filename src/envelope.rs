//! FortiOS response envelope decoding
//!
//! Every CMDB call answers with the same JSON wrapper:
//!
//! ```json
//! {"http_method":"POST","status":"success","http_status":200,"vdom":"root",
//!  "mkey":5,"revision_changed":true,"version":"v7.2.5","results":[...]}
//! ```
//!
//! Failures are reported inside the wrapper (`status` other than `success`,
//! plus a numeric `error` code), so every operation funnels its body through
//! one of the `decode_*` functions here. Each resource kind supplies its own
//! table of known error codes.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Known appliance error codes for one resource kind, mapped to messages
pub type ErrorCodes = BTreeMap<i64, String>;

const STATUS_SUCCESS: &str = "success";
const HTTP_NOT_FOUND: u16 = 404;

/// Outcome of a lookup: a 404 from the appliance is a valid, empty answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Typed view of the response wrapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub vdom: Option<String>,
    /// Created (number) and updated (string) objects report their key
    /// differently; both arrive here as a string.
    #[serde(default, deserialize_with = "key_as_string")]
    pub mkey: Option<String>,
    #[serde(default, deserialize_with = "key_as_string")]
    pub skey: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<Number>,
    #[serde(default)]
    pub http_status: Option<u16>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub revision_changed: Option<bool>,
    #[serde(default)]
    pub results: Option<Value>,
}

/// What a successful create or update reports back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skey: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_changed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Number(Number),
    Text(String),
}

fn key_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<KeyRepr>::deserialize(deserializer)?.map(|key| match key {
        KeyRepr::Number(n) => number_to_key(&n),
        KeyRepr::Text(s) => s,
    }))
}

/// Render a numeric key with no decimal places
fn number_to_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format!("{:.0}", n.as_f64().unwrap_or_default())
    }
}

fn number_to_code(n: &Number) -> i64 {
    n.as_i64()
        .unwrap_or_else(|| n.as_f64().unwrap_or_default().round() as i64)
}

impl Envelope {
    /// Parse a raw response body; anything but a JSON object is malformed
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(Error::Malformed("empty response body".to_string()));
        }
        match serde_json::from_str(body) {
            Ok(Value::Object(map)) => serde_json::from_value(Value::Object(map))
                .map_err(|e| Error::Malformed(e.to_string())),
            Ok(_) => Err(Error::Malformed(
                "response body is not a JSON object".to_string(),
            )),
            Err(e) => Err(Error::Malformed(e.to_string())),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(HTTP_NOT_FOUND)
    }

    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(number_to_code)
    }

    /// Fail unless `status` is present and equals `success`
    pub fn check(&self, codes: &ErrorCodes) -> Result<()> {
        let Some(status) = self.status.as_deref() else {
            return Err(Error::MissingStatus);
        };
        if status == STATUS_SUCCESS {
            return Ok(());
        }

        let code = self.error_code();
        let message = match code {
            Some(code) => codes
                .get(&code)
                .cloned()
                .unwrap_or_else(|| format!("status is {status} and error no is {code}")),
            None => format!("status is {status} and error no is not found"),
        };

        tracing::warn!(
            "FortiOS rejected request: status={}, error={:?}, http_status={:?}: {}",
            status,
            code,
            self.http_status,
            message
        );

        Err(Error::Api {
            status: status.to_string(),
            code,
            http_status: self.http_status,
            message,
        })
    }

    pub fn into_write_result(self) -> WriteResult {
        WriteResult {
            vdom: self.vdom,
            mkey: self.mkey,
            skey: self.skey,
            status: self.status.unwrap_or_default(),
            http_status: self.http_status.map(|s| s.to_string()),
            version: self.version,
            revision_changed: self.revision_changed,
        }
    }

    /// Lookups need `http_status` to tell "not found" from a real failure
    fn require_http_status(&self) -> Result<()> {
        match self.http_status {
            Some(_) => Ok(()),
            None => Err(Error::MissingHttpStatus),
        }
    }
}

/// Decode the answer to a create or update
pub fn decode_write(body: &str, codes: &ErrorCodes) -> Result<WriteResult> {
    let envelope = Envelope::parse(body)?;
    envelope.check(codes)?;
    Ok(envelope.into_write_result())
}

/// Decode the answer to a delete; no payload is expected
pub fn decode_delete(body: &str, codes: &ErrorCodes) -> Result<()> {
    Envelope::parse(body)?.check(codes)
}

/// Decode the answer to a lookup by key.
///
/// `results` may be a single object or a sequence; for a sequence the first
/// element is the answer.
pub fn decode_lookup<T: DeserializeOwned>(body: &str, codes: &ErrorCodes) -> Result<Lookup<T>> {
    let envelope = Envelope::parse(body)?;
    envelope.require_http_status()?;
    if envelope.is_not_found() {
        return Ok(Lookup::NotFound);
    }
    envelope.check(codes)?;

    let item = match envelope.results {
        Some(Value::Array(items)) => items.into_iter().next(),
        Some(Value::Null) | None => None,
        Some(other) => Some(other),
    }
    .ok_or_else(|| Error::Malformed("cannot get the results from the response".to_string()))?;

    convert(item).map(Lookup::Found)
}

/// Decode the answer to a table listing, keeping the appliance's order.
/// An empty table (404) lists as no items.
pub fn decode_list<T: DeserializeOwned>(body: &str, codes: &ErrorCodes) -> Result<Vec<T>> {
    let envelope = Envelope::parse(body)?;
    envelope.require_http_status()?;
    if envelope.is_not_found() {
        return Ok(Vec::new());
    }
    envelope.check(codes)?;

    match envelope.results {
        Some(Value::Array(items)) => items.into_iter().map(convert).collect(),
        Some(Value::Object(map)) => convert(Value::Object(map)).map(|item| vec![item]),
        _ => Err(Error::Malformed(
            "cannot get the results from the response".to_string(),
        )),
    }
}

fn convert<T: DeserializeOwned>(item: Value) -> Result<T> {
    serde_json::from_value(item)
        .map_err(|e| Error::Malformed(format!("cannot convert the results from the response: {e}")))
}
