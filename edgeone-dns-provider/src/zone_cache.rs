//! Domain → zone id cache with single-flight resolution.
//!
//! A cached id is served for [`DEFAULT_ZONE_ID_TTL`] (or the configured TTL)
//! after it was resolved. A miss goes through a per-domain in-flight
//! registry: the first caller runs the resolver, every caller arriving while
//! it runs waits for and receives the same outcome. Failures are shared but
//! never cached.
//!
//! Entries are never evicted; staleness is checked when read.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{ProviderError, Result};
use crate::utils::names::normalize_domain_name;

/// Default lifetime of a resolved zone id.
pub const DEFAULT_ZONE_ID_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CachedZone {
    zone_id: String,
    resolved_at: Instant,
}

/// `None` until the initiating caller publishes its outcome.
type Outcome = Option<Result<String>>;

/// Zone id cache shared by every operation of one or more providers.
#[derive(Debug)]
pub struct ZoneCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedZone>>,
    in_flight: Mutex<HashMap<String, watch::Receiver<Outcome>>>,
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new(DEFAULT_ZONE_ID_TTL)
    }
}

enum Role {
    Initiator(watch::Sender<Outcome>),
    Waiter(watch::Receiver<Outcome>),
}

/// Clears the in-flight entry for `domain` when the initiator finishes or is
/// dropped mid-resolution.
struct InFlightGuard<'a> {
    cache: &'a ZoneCache,
    domain: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.cache.lock_in_flight().remove(self.domain);
    }
}

impl ZoneCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve `zone` to its zone id.
    ///
    /// `resolver` receives the domain without its trailing dot and runs at
    /// most once per domain for any set of overlapping callers. If the
    /// caller running it is dropped, the callers waiting on it get
    /// [`ProviderError::Cancelled`].
    pub async fn resolve<F, Fut>(&self, zone: &str, resolver: F) -> Result<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let domain = normalize_domain_name(zone);
        if let Some(zone_id) = self.fresh(domain) {
            log::debug!("zone cache hit: {domain} -> {zone_id}");
            return Ok(zone_id);
        }

        let role = {
            let mut in_flight = self.lock_in_flight();
            if let Some(rx) = in_flight.get(domain) {
                Role::Waiter(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                in_flight.insert(domain.to_string(), rx);
                Role::Initiator(tx)
            }
        };

        match role {
            Role::Waiter(rx) => {
                log::debug!("zone cache: joining in-flight resolution of {domain}");
                Self::wait(domain, rx).await
            }
            Role::Initiator(tx) => {
                let guard = InFlightGuard {
                    cache: self,
                    domain,
                };

                // another caller may have finished between the first check
                // and taking the in-flight slot
                let result = match self.fresh(domain) {
                    Some(zone_id) => Ok(zone_id),
                    None => {
                        log::debug!("zone cache miss: resolving {domain}");
                        resolver(domain.to_string()).await
                    }
                };

                if let Ok(zone_id) = &result {
                    self.store(domain, zone_id);
                }
                drop(guard);
                tx.send_replace(Some(result.clone()));
                result
            }
        }
    }

    /// Cached id for `zone` if it is still fresh.
    pub fn get(&self, zone: &str) -> Option<String> {
        self.fresh(normalize_domain_name(zone))
    }

    async fn wait(domain: &str, mut rx: watch::Receiver<Outcome>) -> Result<String> {
        match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or_else(|| {
                Err(ProviderError::Cancelled {
                    zone: domain.to_string(),
                })
            }),
            Err(_) => Err(ProviderError::Cancelled {
                zone: domain.to_string(),
            }),
        }
    }

    fn fresh(&self, domain: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(domain)
            .filter(|cached| cached.resolved_at.elapsed() <= self.ttl)
            .map(|cached| cached.zone_id.clone())
    }

    fn store(&self, domain: &str, zone_id: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                domain.to_string(),
                CachedZone {
                    zone_id: zone_id.to_string(),
                    resolved_at: Instant::now(),
                },
            );
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, watch::Receiver<Outcome>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
