//! Split memoisation using Moka.
//!
//! A split depends only on the amount, the kind, the share type and the
//! percentages that apply to the transaction's category, so those resolved
//! inputs form the cache key. Editing settings changes the key; stale entries
//! simply age out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fieldshare_shared::config::CacheConfig;
use moka::sync::Cache;
use rust_decimal::Decimal;

use super::calculator::{ShareSplitCalculator, SplitOptions, Splitter};
use super::error::SplitError;
use super::types::{
    CategoryId, CategoryShareDefaults, ShareAgreement, ShareType, SplitResult, Transaction,
    TransactionKind,
};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SplitKey {
    amount: Decimal,
    kind: TransactionKind,
    category: Option<CategoryId>,
    share_type: ShareType,
    override_pct: Option<Decimal>,
    default_pct: Option<Decimal>,
    recorded_share: Option<Decimal>,
    options: SplitOptions,
}

impl SplitKey {
    fn new(
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
        options: SplitOptions,
    ) -> Self {
        let category = match transaction.kind {
            TransactionKind::Income => None,
            TransactionKind::Expense => transaction.category_id.clone(),
        };
        let override_pct = category
            .as_ref()
            .and_then(|c| agreement.category_overrides.get(c));
        let default_pct = category.as_ref().and_then(|c| defaults.get(c));

        Self {
            amount: transaction.amount,
            kind: transaction.kind,
            category,
            share_type: agreement.share_type,
            override_pct,
            default_pct,
            recorded_share: transaction.recorded_share,
            options,
        }
    }
}

/// Memoising wrapper around [`ShareSplitCalculator`].
///
/// Thread-safe; clones share the same underlying cache.
#[derive(Clone)]
pub struct SplitCache {
    calculator: ShareSplitCalculator,
    cache: Cache<SplitKey, SplitResult>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl SplitCache {
    /// Creates a cache with default settings (10k entries, 5 minute TTL).
    #[must_use]
    pub fn new(calculator: ShareSplitCalculator) -> Self {
        Self::with_config(calculator, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and time-to-live.
    #[must_use]
    pub fn with_config(calculator: ShareSplitCalculator, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            calculator,
            cache,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a cache from the `cache` configuration section.
    #[must_use]
    pub fn from_config(calculator: ShareSplitCalculator, config: &CacheConfig) -> Self {
        Self::with_config(calculator, config.max_capacity, config.ttl_secs)
    }

    /// Returns the wrapped calculator.
    #[must_use]
    pub const fn calculator(&self) -> &ShareSplitCalculator {
        &self.calculator
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to compute the split.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Splitter for SplitCache {
    fn compute_split(
        &self,
        transaction: &Transaction,
        agreement: &ShareAgreement,
        defaults: &CategoryShareDefaults,
    ) -> Result<SplitResult, SplitError> {
        let key = SplitKey::new(transaction, agreement, defaults, *self.calculator.options());

        if let Some(cached) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        // Failures are not cached
        let result = self
            .calculator
            .compute_split(transaction, agreement, defaults)?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.cache.insert(key, result);

        Ok(result)
    }
}
