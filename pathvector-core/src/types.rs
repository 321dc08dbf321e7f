//! Protocol records as they appear in the protocols JSON file.
//!
//! The file is a single object keyed by protocol identifier:
//!
//! ```json
//! { "eu_AS1234_v4": { "Name": "Europe Link", "Tags": ["core"], "ASN": 1234 } }
//! ```
//!
//! Field names match case-insensitively and the last occurrence wins, so
//! `{"NAME": "a", "name": "b"}` decodes to the name `"b"`. Missing fields
//! and explicit `null`s leave the zero value; unknown fields are ignored; a
//! `null` record is an all-default record.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier → record, as decoded from one version of the protocols file.
pub type ProtocolMap = HashMap<String, Protocol>;

/// Metadata for one known protocol identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Protocol {
    /// Display name. Lookups may append an IP-version suffix.
    #[serde(rename = "Name")]
    pub name: String,

    /// Free-form labels, order preserved from the source file.
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,

    /// Autonomous system number; `0` means unknown.
    #[serde(rename = "ASN")]
    pub asn: i64,
}

impl Protocol {
    /// The record served for identifiers missing from the current mapping.
    pub fn unknown(identifier: &str) -> Self {
        Self {
            name: identifier.to_owned(),
            tags: Vec::new(),
            asn: 0,
        }
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ProtocolVisitor)
    }
}

struct ProtocolVisitor;

impl<'de> Visitor<'de> for ProtocolVisitor {
    type Value = Protocol;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a protocol object with Name, Tags and ASN fields")
    }

    fn visit_unit<E>(self) -> Result<Protocol, E>
    where
        E: de::Error,
    {
        Ok(Protocol::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Protocol, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut protocol = Protocol::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("name") {
                if let Some(name) = map.next_value::<Option<String>>()? {
                    protocol.name = name;
                }
            } else if key.eq_ignore_ascii_case("tags") {
                if let Some(tags) = map.next_value::<Option<Vec<String>>>()? {
                    protocol.tags = tags;
                }
            } else if key.eq_ignore_ascii_case("asn") {
                if let Some(asn) = map.next_value::<Option<i64>>()? {
                    protocol.asn = asn;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(protocol)
    }
}

/// Decode a whole protocols document. A top-level `null` is an empty mapping.
pub(crate) fn decode_map(bytes: &[u8]) -> Result<ProtocolMap, serde_json::Error> {
    let decoded: Option<ProtocolMap> = serde_json::from_slice(bytes)?;
    Ok(decoded.unwrap_or_default())
}
