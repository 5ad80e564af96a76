//! EdgeOne `DnsRecordProvider` trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::reconcile::{DesiredRecord, RecordQuery, RecordUpdate, Reconciler};
use crate::traits::{DnsRecordProvider, RecordFinder, RecordMutator};
use crate::types::DnsRecord;

use super::types::{
    CreateDnsRecordResponse, DeleteDnsRecordsRequest, DescribeDnsRecordsRequest,
    DescribeDnsRecordsResponse, DescribeZonesRequest, DescribeZonesResponse, EdgeOneRecord,
    EmptyResponse, Filter, ModifyDnsRecordsRequest,
};
use super::{EdgeOneProvider, MAX_PAGE_SIZE};

const ACTION_DESCRIBE_ZONES: &str = "DescribeZones";
const ACTION_DESCRIBE_RECORDS: &str = "DescribeDnsRecords";
const ACTION_CREATE_RECORD: &str = "CreateDnsRecord";
const ACTION_MODIFY_RECORDS: &str = "ModifyDnsRecords";
const ACTION_DELETE_RECORDS: &str = "DeleteDnsRecords";

/// Oldest first, so the newest records are reused first by `set_records`.
const SORT_CREATED_ON: &str = "created-on";

impl EdgeOneProvider {
    /// 通过 `DescribeZones` 查询站点 ID
    pub(crate) async fn describe_zone_id(&self, domain: &str) -> Result<String> {
        let req = DescribeZonesRequest {
            filters: vec![Filter::exact("zone-name", domain)],
        };
        let resp: DescribeZonesResponse = self.request(ACTION_DESCRIBE_ZONES, &req).await?;

        let zone = resp
            .zones
            .iter()
            .find(|z| {
                z.zone_name
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(domain))
            })
            .or_else(|| resp.zones.first())
            .ok_or_else(|| ProviderError::ZoneNotFound {
                zone: domain.to_string(),
            })?;

        log::debug!("resolved zone {domain} -> {}", zone.zone_id);
        Ok(zone.zone_id.clone())
    }

    /// 获取站点 ID（带缓存）
    pub(crate) async fn zone_id(&self, zone: &str) -> Result<String> {
        self.zone_cache
            .resolve(zone, |domain| async move { self.describe_zone_id(&domain).await })
            .await
    }

    /// 分页获取站点下全部记录
    pub(crate) async fn list_records(&self, zone_id: &str) -> Result<Vec<EdgeOneRecord>> {
        let mut records = Vec::new();
        let mut offset = 0u32;

        loop {
            let req = DescribeDnsRecordsRequest {
                zone_id: zone_id.to_string(),
                offset,
                limit: MAX_PAGE_SIZE,
                filters: Vec::new(),
                sort_by: Some(SORT_CREATED_ON),
            };
            let resp: DescribeDnsRecordsResponse =
                self.request(ACTION_DESCRIBE_RECORDS, &req).await?;

            let page_len = resp.dns_records.len();
            records.extend(resp.dns_records);

            let total = resp.total_count.unwrap_or_default();
            if page_len < MAX_PAGE_SIZE as usize || records.len() as u64 >= total {
                break;
            }
            offset = u32::try_from(records.len()).map_err(|_| {
                invalid_result(ACTION_DESCRIBE_RECORDS, "record offset out of range")
            })?;
        }

        Ok(records)
    }

    fn desired_records(zone: &str, records: &[DnsRecord]) -> Result<Vec<DesiredRecord>> {
        records
            .iter()
            .map(|record| DesiredRecord::from_record(zone, record))
            .collect()
    }
}

fn invalid_result(action: &str, detail: &str) -> ProviderError {
    ProviderError::InvalidResult {
        action: action.to_string(),
        detail: detail.to_string(),
    }
}

#[async_trait]
impl RecordFinder for EdgeOneProvider {
    async fn find_record_ids(&self, zone_id: &str, query: &RecordQuery) -> Result<Vec<String>> {
        let mut filters = vec![
            Filter::exact("name", &query.name),
            Filter::exact("type", &query.record_type),
        ];
        if let Some(content) = &query.content {
            filters.push(Filter::exact("content", content));
        }

        let req = DescribeDnsRecordsRequest {
            zone_id: zone_id.to_string(),
            offset: 0,
            limit: MAX_PAGE_SIZE,
            filters,
            sort_by: Some(SORT_CREATED_ON),
        };
        let resp: DescribeDnsRecordsResponse = self.request(ACTION_DESCRIBE_RECORDS, &req).await?;

        Ok(resp
            .dns_records
            .into_iter()
            .filter(EdgeOneRecord::is_enabled)
            .map(|record| record.record_id)
            .collect())
    }
}

#[async_trait]
impl RecordMutator for EdgeOneProvider {
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<String> {
        let req = EdgeOneRecord::from_desired(zone_id, None, record);
        let resp: CreateDnsRecordResponse = self.request(ACTION_CREATE_RECORD, &req).await?;

        if resp.record_id.is_empty() {
            return Err(invalid_result(ACTION_CREATE_RECORD, "response has no RecordId"));
        }
        log::debug!("created record {} ({} {})", resp.record_id, record.name, record.record_type);
        Ok(resp.record_id)
    }

    async fn modify_records(&self, zone_id: &str, updates: &[RecordUpdate]) -> Result<()> {
        let req = ModifyDnsRecordsRequest {
            zone_id: zone_id.to_string(),
            dns_records: updates
                .iter()
                .map(|u| {
                    EdgeOneRecord::from_desired(zone_id, Some(u.record_id.as_str()), &u.record)
                })
                .collect(),
        };
        let _: EmptyResponse = self.request(ACTION_MODIFY_RECORDS, &req).await?;
        Ok(())
    }

    async fn delete_record_ids(&self, zone_id: &str, record_ids: &[String]) -> Result<()> {
        let req = DeleteDnsRecordsRequest {
            zone_id: zone_id.to_string(),
            record_ids: record_ids.to_vec(),
        };
        let _: EmptyResponse = self.request(ACTION_DELETE_RECORDS, &req).await?;
        Ok(())
    }
}

#[async_trait]
impl DnsRecordProvider for EdgeOneProvider {
    fn id(&self) -> &'static str {
        "edgeone"
    }

    async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        self.list_records(&zone_id)
            .await?
            .iter()
            .map(|record| record.to_dns_record(zone))
            .collect()
    }

    async fn append_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        let desired = Self::desired_records(zone, records)?;
        Reconciler::new(self, self).append(&zone_id, &desired).await?;
        Ok(records.to_vec())
    }

    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        let desired = Self::desired_records(zone, records)?;
        Reconciler::new(self, self).set(&zone_id, &desired).await?;
        Ok(records.to_vec())
    }

    async fn delete_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(zone).await?;
        let desired = Self::desired_records(zone, records)?;
        Reconciler::new(self, self).delete(&zone_id, &desired).await?;
        Ok(records.to_vec())
    }
}
