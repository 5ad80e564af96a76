//! Tencent Cloud EdgeOne API type definition

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::reconcile::DesiredRecord;
use crate::types::{DnsRecord, RecordData, ResourceRecord};
use crate::utils::names::relative_name;

// ============ Tencent Cloud API response structure ============

/// Generic Tencent Cloud response envelope.
///
/// The payload is decoded in two steps: the `Error` field is checked first,
/// then the remainder is decoded into the action-specific type.
#[derive(Debug, Deserialize)]
pub struct TencentResponse {
    #[serde(rename = "Response")]
    pub response: serde_json::Value,
}

impl TencentResponse {
    /// The `Error` object, if the API reported one.
    ///
    /// A present `Error` that does not decode is itself an error, never a
    /// success.
    pub fn error(&self) -> std::result::Result<Option<TencentError>, serde_json::Error> {
        match self.response.get("Error") {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(error) => TencentError::deserialize(error).map(Some),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.response.get("RequestId").and_then(|v| v.as_str())
    }
}

/// Error payload nested inside Tencent Cloud responses.
#[derive(Debug, Deserialize)]
pub struct TencentError {
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

// ============ Request structure ============

/// Filter entry shared by the `Describe*` actions.
#[derive(Debug, Clone, Serialize)]
pub struct Filter {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Values")]
    pub values: Vec<String>,
}

impl Filter {
    pub fn exact(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DescribeZonesRequest {
    #[serde(rename = "Filters", skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Serialize)]
pub struct DescribeDnsRecordsRequest {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "Offset", skip_serializing_if = "is_zero")]
    pub offset: u32,
    #[serde(rename = "Limit", skip_serializing_if = "is_zero")]
    pub limit: u32,
    #[serde(rename = "Filters", skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(rename = "SortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ModifyDnsRecordsRequest {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "DnsRecords", skip_serializing_if = "Vec::is_empty")]
    pub dns_records: Vec<EdgeOneRecord>,
}

#[derive(Debug, Serialize)]
pub struct DeleteDnsRecordsRequest {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

// ============ Response structure ============

/// Response payload for `DescribeZones`.
#[derive(Debug, Deserialize)]
pub struct DescribeZonesResponse {
    #[serde(rename = "Zones", default)]
    pub zones: Vec<ZoneSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneSummary {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "ZoneName")]
    pub zone_name: Option<String>,
}

/// Response payload for `DescribeDnsRecords`.
#[derive(Debug, Deserialize)]
pub struct DescribeDnsRecordsResponse {
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u64>,
    #[serde(rename = "DnsRecords", default)]
    pub dns_records: Vec<EdgeOneRecord>,
}

/// Response payload for `CreateDnsRecord`.
#[derive(Debug, Deserialize)]
pub struct CreateDnsRecordResponse {
    #[serde(rename = "RecordId", default)]
    pub record_id: String,
}

/// Response payload for actions that only return a `RequestId`.
#[derive(Debug, Deserialize)]
pub struct EmptyResponse {}

// ============ DNS record ============

/// DNS record as the EdgeOne API reads and writes it.
///
/// `Name` is absolute without the trailing dot. `CreateDnsRecord` takes
/// these fields flattened at the top level of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeOneRecord {
    #[serde(rename = "ZoneId", default)]
    pub zone_id: String,
    #[serde(rename = "RecordId", default, skip_serializing_if = "String::is_empty")]
    pub record_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Location", default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(rename = "Priority", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(rename = "Status", default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Record line every record is written to.
const DEFAULT_LOCATION: &str = "Default";
/// `Status` of records that are live.
pub(crate) const STATUS_ENABLED: &str = "enable";

impl EdgeOneRecord {
    /// Wire form of a desired record for `zone_id`, optionally targeting an
    /// existing record.
    pub fn from_desired(zone_id: &str, record_id: Option<&str>, desired: &DesiredRecord) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            record_id: record_id.unwrap_or_default().to_string(),
            name: desired.name.clone(),
            record_type: desired.record_type.clone(),
            content: desired.content.clone(),
            location: DEFAULT_LOCATION.to_string(),
            ttl: Some(desired.ttl),
            priority: desired.priority,
            weight: None,
            status: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }

    /// Convert to a record whose name is relative to `zone`.
    pub fn to_dns_record(&self, zone: &str) -> Result<DnsRecord> {
        let name = relative_name(&self.name, zone);
        let ttl = Duration::from_secs(u64::from(self.ttl.unwrap_or_default()));

        let data = match self.record_type.as_str() {
            "MX" => RecordData::MX {
                preference: self.priority.unwrap_or_default(),
                exchange: self.content.clone(),
            },
            _ => {
                return ResourceRecord {
                    name,
                    record_type: self.record_type.clone(),
                    data: self.content.clone(),
                    ttl,
                }
                .parse()
                .map_err(|e| ProviderError::InvalidRecord {
                    detail: format!("record {} ({}): {e}", self.record_id, self.name),
                });
            }
        };

        Ok(DnsRecord { name, ttl, data })
    }
}
