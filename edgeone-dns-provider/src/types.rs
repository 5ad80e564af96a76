use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

// ============ Credentials ============

/// Tencent Cloud API credentials.
///
/// Immutable for the lifetime of a provider instance. The secret key and
/// session token are redacted from the `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// `SecretId` of the API key pair.
    pub secret_id: String,
    /// `SecretKey` of the API key pair.
    pub secret_key: String,
    /// Temporary session token (STS), sent as `X-TC-Token` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Region, used only to select the regional endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            session_token: None,
            region: None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}

// ============ DNS Record Types ============

/// Type-safe representation of DNS record data.
///
/// [`Other`](Self::Other) carries any record the crate does not model
/// explicitly. It is also how a caller expresses a raw `(type, data)` pair,
/// for example an A record with empty data to delete every A record under
/// a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordData {
    /// A record: maps a hostname to an IPv4 address.
    A {
        /// IPv4 address.
        address: Ipv4Addr,
    },

    /// AAAA record: maps a hostname to an IPv6 address.
    AAAA {
        /// IPv6 address.
        address: Ipv6Addr,
    },

    /// CNAME record: alias from one name to another.
    CNAME {
        /// Target hostname.
        target: String,
    },

    /// MX record: mail exchange server.
    MX {
        /// Preference (lower = preferred).
        preference: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// NS record: authoritative name server.
    NS {
        /// Name server hostname.
        nameserver: String,
    },

    /// TXT record: arbitrary text data.
    TXT {
        /// Text content.
        text: String,
    },

    /// Any other record, kept in its raw presentation form.
    Other {
        /// Record type mnemonic (e.g. `"SRV"`).
        record_type: String,
        /// Record data in presentation format.
        data: String,
    },
}

impl RecordData {
    /// Record type mnemonic as sent to the API.
    pub fn record_type(&self) -> &str {
        match self {
            Self::A { .. } => "A",
            Self::AAAA { .. } => "AAAA",
            Self::CNAME { .. } => "CNAME",
            Self::MX { .. } => "MX",
            Self::NS { .. } => "NS",
            Self::TXT { .. } => "TXT",
            Self::Other { record_type, .. } => record_type,
        }
    }

    /// Record data in presentation format.
    ///
    /// For MX the preference is included (`"10 mail.example.com"`), the same
    /// form [`ResourceRecord::parse`] accepts.
    pub fn presentation(&self) -> String {
        match self {
            Self::A { address } => address.to_string(),
            Self::AAAA { address } => address.to_string(),
            Self::CNAME { target } => target.clone(),
            Self::MX {
                preference,
                exchange,
            } => format!("{preference} {exchange}"),
            Self::NS { nameserver } => nameserver.clone(),
            Self::TXT { text } => text.clone(),
            Self::Other { data, .. } => data.clone(),
        }
    }
}

/// A DNS record whose name is relative to its zone (`"@"` for the apex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Name relative to the zone.
    pub name: String,
    /// Time to live. Zero means "provider default".
    #[serde(with = "ttl_seconds")]
    pub ttl: Duration,
    /// Typed record data.
    pub data: RecordData,
}

impl DnsRecord {
    pub fn new(name: impl Into<String>, ttl: Duration, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    /// The untyped view of this record.
    pub fn rr(&self) -> ResourceRecord {
        ResourceRecord {
            name: self.name.clone(),
            record_type: self.data.record_type().to_string(),
            data: self.data.presentation(),
            ttl: self.ttl,
        }
    }
}

/// Raw `(name, type, data, ttl)` view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: String,
    pub data: String,
    #[serde(with = "ttl_seconds")]
    pub ttl: Duration,
}

impl ResourceRecord {
    /// Parse into a typed [`DnsRecord`].
    ///
    /// A and AAAA data must be an address of the matching family and MX data
    /// must be `"<preference> <exchange>"`. Unknown types are kept as
    /// [`RecordData::Other`].
    pub fn parse(self) -> Result<DnsRecord> {
        let data = match self.record_type.to_uppercase().as_str() {
            "A" => RecordData::A {
                address: self.data.parse().map_err(|e| ProviderError::InvalidRecord {
                    detail: format!("invalid IPv4 address '{}': {e}", self.data),
                })?,
            },
            "AAAA" => RecordData::AAAA {
                address: self.data.parse().map_err(|e| ProviderError::InvalidRecord {
                    detail: format!("invalid IPv6 address '{}': {e}", self.data),
                })?,
            },
            "CNAME" => RecordData::CNAME {
                target: self.data,
            },
            "MX" => {
                let mut parts = self.data.split_whitespace();
                let (Some(preference), Some(exchange), None) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    return Err(ProviderError::InvalidRecord {
                        detail: format!(
                            "invalid MX data: expected 'preference exchange', got '{}'",
                            self.data
                        ),
                    });
                };
                RecordData::MX {
                    preference: preference.parse().map_err(|_| ProviderError::InvalidRecord {
                        detail: format!("invalid MX preference: '{preference}'"),
                    })?,
                    exchange: exchange.to_string(),
                }
            }
            "NS" => RecordData::NS {
                nameserver: self.data,
            },
            "TXT" => RecordData::TXT { text: self.data },
            _ => RecordData::Other {
                record_type: self.record_type,
                data: self.data,
            },
        };

        Ok(DnsRecord {
            name: self.name,
            ttl: self.ttl,
            data,
        })
    }
}

/// Serializes a `Duration` TTL as whole seconds.
mod ttl_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
