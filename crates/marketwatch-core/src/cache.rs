//! Short-TTL memoization of quote batches.
//!
//! Entries are keyed by the sorted, de-duplicated symbol set of a request.
//! Each key owns an async slot; the first caller to find it stale holds the
//! slot while recomputing and later callers for the same key wait on it and
//! receive the same [`Arc<QuoteBatch>`]. A caller that waited through a
//! recomputation takes its result even when the TTL has already lapsed, so
//! a zero TTL still never issues duplicate concurrent fetches.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::quote_adapter::QuoteFetcher;
use crate::{QuoteBatch, QuoteOutcome, Symbol, UtcDateTime};

type CacheKey = Vec<Symbol>;

#[derive(Debug, Default)]
struct Slot {
    /// Recomputations finished for this key.
    generation: AtomicU64,
    entry: tokio::sync::Mutex<Option<CachedBatch>>,
}

#[derive(Debug)]
struct CachedBatch {
    batch: Arc<QuoteBatch>,
    expires_at: Instant,
}

pub struct QuoteCache {
    fetcher: Arc<dyn QuoteFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_concurrency: usize,
    slots: Mutex<HashMap<CacheKey, Arc<Slot>>>,
}

impl QuoteCache {
    /// A zero `ttl` disables reuse across sequential calls; `max_concurrency`
    /// is clamped to at least one in-flight fetch.
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            clock,
            ttl,
            max_concurrency: max_concurrency.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the batch for `symbols`, recomputing it when the cached one
    /// has expired. Never fails: unreachable symbols are `Unavailable`.
    pub async fn fetch_batch(&self, symbols: &[Symbol]) -> Arc<QuoteBatch> {
        let key = cache_key(symbols);
        let slot = self.slot(&key);
        let seen = slot.generation.load(Ordering::Acquire);
        let mut entry = slot.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if slot.generation.load(Ordering::Acquire) != seen {
                debug!(symbols = key.len(), "joined in-flight quote batch");
                return Arc::clone(&cached.batch);
            }
            if self.clock.now() < cached.expires_at {
                debug!(symbols = key.len(), "quote cache hit");
                return Arc::clone(&cached.batch);
            }
        }

        let batch = Arc::new(self.recompute(&key).await);
        *entry = Some(CachedBatch {
            batch: Arc::clone(&batch),
            expires_at: self.clock.now() + self.ttl,
        });
        slot.generation.fetch_add(1, Ordering::Release);
        batch
    }

    /// Drops every cached batch; the next call for any key recomputes.
    pub fn invalidate(&self) {
        self.lock_slots().clear();
    }

    /// Number of distinct symbol sets requested since the last invalidation.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &CacheKey) -> Arc<Slot> {
        let mut slots = self.lock_slots();
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<Slot>>> {
        self.slots
            .lock()
            .expect("quote cache slot lock is not poisoned")
    }

    async fn recompute(&self, key: &[Symbol]) -> QuoteBatch {
        let started = self.clock.now();

        let quotes: BTreeMap<Symbol, QuoteOutcome> = stream::iter(key)
            .map(|symbol| async move { (symbol.clone(), self.fetcher.fetch(symbol).await) })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let batch = QuoteBatch::new(
            quotes,
            UtcDateTime::from_offset_datetime(self.clock.now_utc()),
        );

        info!(
            symbols = batch.len(),
            unavailable = batch.unavailable_count(),
            elapsed_ms = self.clock.now().saturating_duration_since(started).as_millis() as u64,
            "recomputed quote batch"
        );
        batch
    }
}

fn cache_key(symbols: &[Symbol]) -> CacheKey {
    let mut key = symbols.to_vec();
    key.sort();
    key.dedup();
    key
}
