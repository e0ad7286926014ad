//! Stateful transformation of one score, with memoized results.
//!
//! A [`TransformSession`] holds the analysed score in its original key and
//! rhythm, plus whichever transformed version is current. Results are
//! memoized in a [`TransformCache`] under `(key, rhythm)`. The rhythm-only
//! result (original key, new rhythm) is cached as well, so switching keys
//! under an ostinato only pays for the transposition.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use notation::{Key, Measure, Part};
use tracing::{debug, info};

use crate::error::{Result, TransformError};
use crate::rhythm::{fill_ostinato, Rhythm};
use crate::transpose::transpose_parts;

/// Capacity used when a session creates its own cache
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Rhythm a session renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RhythmChoice {
    /// The score's own rhythm
    Original,
    Ostinato(Rhythm),
}

impl fmt::Display for RhythmChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RhythmChoice::Original => write!(f, "original"),
            RhythmChoice::Ostinato(rhythm) => write!(f, "{}", rhythm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub key: Key,
    pub rhythm: RhythmChoice,
}

impl CacheKey {
    pub fn new(key: Key, rhythm: RhythmChoice) -> Self {
        CacheKey { key, rhythm }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.rhythm)
    }
}

/// Shared score data as stored in a cache
pub type Parts = Arc<Vec<Part>>;

/// Read/write contract for memoized transformation results.
///
/// Expiry and eviction are up to the implementation.
pub trait TransformCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<Parts>>;
    fn put(&self, key: CacheKey, parts: Parts) -> Result<()>;
}

/// In-process cache with a fixed capacity.
///
/// Once full, new keys are not stored; existing keys can still be replaced.
pub struct MemoryCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Parts>>,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TransformCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Parts>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| TransformError::Cache("cache mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: CacheKey, parts: Parts) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| TransformError::Cache("cache mutex poisoned".to_string()))?;
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            debug!(key = %key, capacity = self.capacity, "transformation cache full, not storing");
            return Ok(());
        }
        entries.insert(key, parts);
        Ok(())
    }
}

/// One score under transformation, with a cursor over its measures
pub struct TransformSession {
    original: Parts,
    original_key: Key,
    current: Parts,
    key: Key,
    rhythm: RhythmChoice,
    measure_index: usize,
    cache: Arc<dyn TransformCache>,
}

impl TransformSession {
    /// Session with a private [`MemoryCache`]
    pub fn new(parts: Vec<Part>, key: Key) -> Result<Self> {
        Self::with_cache(parts, key, Arc::new(MemoryCache::default()))
    }

    /// Session backed by a caller-supplied cache, seeded with the untouched score
    pub fn with_cache(parts: Vec<Part>, key: Key, cache: Arc<dyn TransformCache>) -> Result<Self> {
        let original: Parts = Arc::new(parts);
        cache.put(CacheKey::new(key, RhythmChoice::Original), original.clone())?;
        Ok(Self {
            current: original.clone(),
            original,
            original_key: key,
            key,
            rhythm: RhythmChoice::Original,
            measure_index: 0,
            cache,
        })
    }

    /// Switch to `key` and `rhythm`, reusing cached results where possible.
    ///
    /// `None` keeps the current key or rhythm.
    pub fn transform(&mut self, key: Option<Key>, rhythm: Option<RhythmChoice>) -> Result<Parts> {
        let key = key.unwrap_or(self.key);
        let rhythm = rhythm.unwrap_or(self.rhythm);
        let cache_key = CacheKey::new(key, rhythm);

        let parts = match self.cache.get(&cache_key)? {
            Some(parts) => {
                info!(key = %cache_key, "transformation cache hit");
                parts
            }
            None => {
                info!(key = %cache_key, "transformation cache miss, computing");
                let base = self.rhythm_only(rhythm)?;
                let parts: Parts = Arc::new(transpose_parts(&base, &key)?);
                self.cache.put(cache_key, parts.clone())?;
                parts
            }
        };

        self.current = parts.clone();
        self.key = key;
        self.rhythm = rhythm;
        Ok(parts)
    }

    /// The score in its original key with `rhythm` applied, via the cache
    fn rhythm_only(&self, rhythm: RhythmChoice) -> Result<Parts> {
        let base_key = CacheKey::new(self.original_key, rhythm);
        if let Some(parts) = self.cache.get(&base_key)? {
            debug!(key = %base_key, "reusing rhythm-only result");
            return Ok(parts);
        }
        let parts: Parts = match rhythm {
            RhythmChoice::Original => self.original.clone(),
            RhythmChoice::Ostinato(rhythm) => Arc::new(
                self.original
                    .iter()
                    .map(|part| fill_ostinato(part, &rhythm))
                    .collect::<Result<Vec<Part>>>()?,
            ),
        };
        self.cache.put(base_key, parts.clone())?;
        Ok(parts)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn rhythm(&self) -> RhythmChoice {
        self.rhythm
    }

    pub fn original_key(&self) -> &Key {
        &self.original_key
    }

    /// The current rendering of every part
    pub fn parts(&self) -> &[Part] {
        &self.current
    }

    /// Length of the longest part
    pub fn measure_count(&self) -> usize {
        self.current.iter().map(|part| part.len()).max().unwrap_or(0)
    }

    pub fn measure_index(&self) -> usize {
        self.measure_index
    }

    /// The measure under the cursor in each part long enough to have one
    pub fn current_measures(&self) -> Vec<&Measure> {
        self.current
            .iter()
            .filter_map(|part| part.get(self.measure_index))
            .collect()
    }

    /// Advance the cursor, wrapping after the last measure
    pub fn step(&mut self) -> Vec<&Measure> {
        let count = self.measure_count();
        if count > 0 {
            self.measure_index = (self.measure_index + 1) % count;
        }
        self.current_measures()
    }

    /// Back to the first measure
    pub fn reset(&mut self) {
        self.measure_index = 0;
    }
}
