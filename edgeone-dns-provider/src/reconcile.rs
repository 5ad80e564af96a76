//! Record reconciliation: append, set and delete.
//!
//! The [`Reconciler`] turns a list of desired records into finder and
//! mutator calls against one resolved zone. None of the operations is
//! transactional: the first failing call aborts and whatever was already
//! created, modified or deleted stays that way.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::Result;
use crate::traits::{RecordFinder, RecordMutator};
use crate::types::{DnsRecord, RecordData, ResourceRecord};
use crate::utils::names::{absolute_name, to_ascii_name};

/// TTL used when the caller leaves it at zero.
pub const DEFAULT_TTL: u32 = 300;
/// Smallest TTL the provider accepts.
pub const MIN_TTL: u32 = 60;
/// Largest TTL the provider accepts.
pub const MAX_TTL: u32 = 86400;

/// A record normalized into the form the provider stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    /// Absolute IDNA ASCII name without the trailing dot.
    pub name: String,
    pub record_type: String,
    /// Record data; for MX only the exchange, the preference goes in
    /// [`priority`](Self::priority).
    pub content: String,
    /// TTL in seconds, already defaulted and clamped.
    pub ttl: u32,
    pub priority: Option<u16>,
}

impl DesiredRecord {
    /// Normalize `record`, whose name is relative to `zone`.
    ///
    /// Raw [`RecordData::Other`] data is parsed first, so a raw MX still has
    /// its preference split out. Empty raw data is kept as is: it stands for
    /// "any content" when deleting.
    pub fn from_record(zone: &str, record: &DnsRecord) -> Result<Self> {
        let name = to_ascii_name(&absolute_name(&record.name, zone))?;
        let data = match &record.data {
            RecordData::Other { record_type, data } if !data.is_empty() => {
                ResourceRecord {
                    name: record.name.clone(),
                    record_type: record_type.clone(),
                    data: data.clone(),
                    ttl: record.ttl,
                }
                .parse()?
                .data
            }
            data => data.clone(),
        };
        let (content, priority) = match &data {
            RecordData::MX {
                preference,
                exchange,
            } => (exchange.clone(), Some(*preference)),
            data => (data.presentation(), None),
        };

        Ok(Self {
            name,
            record_type: data.record_type().to_string(),
            content,
            ttl: wire_ttl(record.ttl),
            priority,
        })
    }
}

/// 0 → [`DEFAULT_TTL`], otherwise clamped to `[MIN_TTL, MAX_TTL]`.
fn wire_ttl(ttl: Duration) -> u32 {
    match ttl.as_secs() {
        0 => DEFAULT_TTL,
        secs => u32::try_from(secs).map_or(MAX_TTL, |s| s.clamp(MIN_TTL, MAX_TTL)),
    }
}

/// Which existing records a lookup should return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordQuery {
    pub name: String,
    pub record_type: String,
    /// Exact content to match; `None` matches any content.
    pub content: Option<String>,
}

impl RecordQuery {
    /// Every record with the same name and type, whatever its content.
    pub fn same_name_and_type(record: &DesiredRecord) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            content: None,
        }
    }

    /// Exact match when `record` has content, name and type otherwise.
    pub fn same_content(record: &DesiredRecord) -> Self {
        Self {
            content: Some(record.content.clone()).filter(|c| !c.is_empty()),
            ..Self::same_name_and_type(record)
        }
    }
}

/// An existing record to overwrite in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub record_id: String,
    pub record: DesiredRecord,
}

/// Identifiers found for one key, handed out newest first.
struct Candidates {
    ids: Vec<String>,
    cursor: usize,
}

impl Candidates {
    fn new(ids: Vec<String>) -> Self {
        let cursor = ids.len();
        Self { ids, cursor }
    }

    fn take(&mut self) -> Option<&str> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(&self.ids[self.cursor])
    }
}

/// Drives finder and mutator calls for one zone.
pub struct Reconciler<'a> {
    finder: &'a dyn RecordFinder,
    mutator: &'a dyn RecordMutator,
}

impl<'a> Reconciler<'a> {
    pub fn new(finder: &'a dyn RecordFinder, mutator: &'a dyn RecordMutator) -> Self {
        Self { finder, mutator }
    }

    /// Create every record, in order. Returns the new identifiers.
    pub async fn append(&self, zone_id: &str, records: &[DesiredRecord]) -> Result<Vec<String>> {
        let mut created = Vec::with_capacity(records.len());
        for record in records {
            created.push(self.mutator.create_record(zone_id, record).await?);
        }
        Ok(created)
    }

    /// Make each `(name, type)` hold the desired records.
    ///
    /// Existing records are reused from the most recently created backwards
    /// and rewritten in one batched update after every record is assigned.
    /// Records left over once a key's identifiers run out are created
    /// immediately. Content is not compared; surplus existing records are
    /// left untouched.
    ///
    /// Returns the identifier each desired record ended up in, in input
    /// order.
    pub async fn set(&self, zone_id: &str, records: &[DesiredRecord]) -> Result<Vec<String>> {
        let mut matches: HashMap<RecordQuery, Candidates> = HashMap::new();
        let mut updates = Vec::new();
        let mut assigned = Vec::with_capacity(records.len());

        for record in records {
            let candidates = match matches.entry(RecordQuery::same_name_and_type(record)) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let ids = self.finder.find_record_ids(zone_id, entry.key()).await?;
                    entry.insert(Candidates::new(ids))
                }
            };

            if let Some(record_id) = candidates.take() {
                updates.push(RecordUpdate {
                    record_id: record_id.to_string(),
                    record: record.clone(),
                });
                assigned.push(record_id.to_string());
            } else {
                assigned.push(self.mutator.create_record(zone_id, record).await?);
            }
        }

        if !updates.is_empty() {
            log::debug!("updating {} record(s) in zone {zone_id}", updates.len());
            self.mutator.modify_records(zone_id, &updates).await?;
        }

        Ok(assigned)
    }

    /// Delete the matching records in one call.
    ///
    /// A record with empty content matches every record of its name and
    /// type; otherwise the content must match exactly. Returns the deleted
    /// identifiers; nothing matching is not an error.
    pub async fn delete(&self, zone_id: &str, records: &[DesiredRecord]) -> Result<Vec<String>> {
        let mut queried = HashSet::new();
        let mut seen = HashSet::new();
        let mut record_ids = Vec::new();

        for record in records {
            let query = RecordQuery::same_content(record);
            if !queried.insert(query.clone()) {
                continue;
            }
            for id in self.finder.find_record_ids(zone_id, &query).await? {
                if seen.insert(id.clone()) {
                    record_ids.push(id);
                }
            }
        }

        if record_ids.is_empty() {
            log::debug!("no matching records to delete in zone {zone_id}");
        } else {
            self.mutator.delete_record_ids(zone_id, &record_ids).await?;
        }

        Ok(record_ids)
    }
}
