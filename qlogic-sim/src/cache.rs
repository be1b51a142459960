//! Layer caching
//!
//! Repeated statevector runs during histogram enumeration apply the same
//! layers over and over, often to the same input vector. Two bounded LRU
//! maps remember the composed operator of a layer and the vector a layer
//! produced from a given input.

use crate::layers::{Layer, LayerPlan};
use crate::profile::ProfileTable;
use num_complex::Complex64;
use qlogic_core::{ComponentId, ComponentTypeId};
use qlogic_state::StateFingerprint;
use serde::{Deserialize, Serialize};
use ahash::AHashMap;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// Distinct primes weighting each slot of the layer encoding; slot `i`
/// uses `LAYER_PRIMES[i % 33]`
const LAYER_PRIMES: [u64; 33] = [
    4397, 4409, 4421, 4423, 4441, 4447, 4451, 4457, 4463, 4481, 4483, 4493, 4507, 4513, 4517,
    4519, 4523, 4547, 4549, 4561, 4567, 4583, 4591, 4597, 4603, 4621, 4637, 4639, 4643, 4649,
    4651, 4657, 4663,
];

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of cache evictions
    pub evictions: usize,
    /// Current cache size
    pub current_size: usize,
    /// Maximum cache size
    pub max_size: usize,
}

impl CacheStatistics {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl std::fmt::Display for CacheStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} hits / {} misses ({:.1}%), {} evictions, {}/{} entries",
            self.hits,
            self.misses,
            self.hit_rate(),
            self.evictions,
            self.current_size,
            self.max_size
        )
    }
}

/// Bounded map with least-recently-used eviction
///
/// Both lookups and insertions make an entry most recent.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    max_size: usize,
    entries: AHashMap<K, V>,
    /// Most recently used at the back
    lru_queue: VecDeque<K>,
    stats: CacheStatistics,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `max_size` entries
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            entries: AHashMap::new(),
            lru_queue: VecDeque::new(),
            stats: CacheStatistics {
                max_size,
                ..Default::default()
            },
        }
    }

    /// Look up an entry, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                let value = value.clone();
                self.touch(key);
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Insert or replace an entry, evicting the least recently used one
    /// when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.max_size == 0 {
            return;
        }

        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut e) => {
                e.insert(value);
                self.touch(&key);
            }
            Entry::Vacant(e) => {
                e.insert(value);
                self.lru_queue.push_back(key);
                while self.entries.len() > self.max_size {
                    let Some(oldest) = self.lru_queue.pop_front() else {
                        break;
                    };
                    self.entries.remove(&oldest);
                    self.stats.evictions += 1;
                }
            }
        }

        self.stats.current_size = self.entries.len();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru_queue.clear();
        self.stats.current_size = 0;
    }

    /// Get cache statistics
    pub fn statistics(&self) -> CacheStatistics {
        self.stats.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.lru_queue.iter().position(|k| k == key) {
            if let Some(k) = self.lru_queue.remove(pos) {
                self.lru_queue.push_back(k);
            }
        }
    }
}

/// What occupies one slot of a layer, as seen by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Empty,
    Occupied {
        type_id: ComponentTypeId,
        /// Ordinal of the component among the layer's components
        member: u8,
        /// Which of the component's lanes sits on this slot
        lane: u8,
    },
}

/// Type- and arrangement-sensitive key of a layer
///
/// Hashes by the prime-weighted encoding; equality compares every slot so
/// that two arrangements with the same encoding never share an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerKey {
    encoding: u64,
    slots: Vec<SlotKey>,
}

impl Hash for LayerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoding.hash(state);
    }
}

impl LayerKey {
    /// Key for `layer`, or `None` when a component's operator varies per
    /// instance and the layer must not be cached
    pub fn for_layer(layer: &Layer, plan: &LayerPlan, profiles: &ProfileTable) -> Option<Self> {
        let members = layer.components();
        let mut slots = Vec::with_capacity(layer.num_qubits());

        for (qubit, slot) in layer.slots().iter().enumerate() {
            let key = match slot {
                None => SlotKey::Empty,
                Some(id) => {
                    let profile = profiles.get(*id)?;
                    if profile.varying {
                        return None;
                    }
                    SlotKey::Occupied {
                        type_id: profile.type_id,
                        member: ordinal(&members, *id)?,
                        lane: lane_of(plan, *id, qubit)?,
                    }
                }
            };
            slots.push(key);
        }

        let encoding = slots
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, slot)| {
                let weight = match slot {
                    SlotKey::Empty => 1,
                    SlotKey::Occupied { type_id, .. } => u64::from(*type_id) + 2,
                };
                acc.wrapping_add(weight.wrapping_mul(LAYER_PRIMES[i % LAYER_PRIMES.len()]))
            });

        Some(Self { encoding, slots })
    }

    #[inline]
    pub fn encoding(&self) -> u64 {
        self.encoding
    }
}

fn ordinal(members: &[ComponentId], id: ComponentId) -> Option<u8> {
    members.iter().position(|m| *m == id).and_then(|p| u8::try_from(p).ok())
}

fn lane_of(plan: &LayerPlan, id: ComponentId, qubit: usize) -> Option<u8> {
    plan.qubits_of(id)?
        .iter()
        .position(|q| q.index() == qubit)
        .and_then(|p| u8::try_from(p).ok())
}

/// Key of one layer transition: the layer and the vector it was applied to
pub type ResultKey = (LayerKey, StateFingerprint);

/// Operator and transition caches owned by one simulator
#[derive(Debug, Clone)]
pub struct LayerCache {
    unitaries: LruCache<LayerKey, Vec<Complex64>>,
    results: LruCache<ResultKey, Vec<Complex64>>,
    enabled: bool,
}

impl LayerCache {
    pub fn new(capacity: usize, enabled: bool) -> Self {
        Self {
            unitaries: LruCache::new(capacity),
            results: LruCache::new(capacity),
            enabled,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn unitary(&mut self, key: &LayerKey) -> Option<Vec<Complex64>> {
        self.unitaries.get(key)
    }

    pub fn store_unitary(&mut self, key: LayerKey, unitary: Vec<Complex64>) {
        self.unitaries.insert(key, unitary);
    }

    pub fn result(&mut self, key: &ResultKey) -> Option<Vec<Complex64>> {
        self.results.get(key)
    }

    pub fn store_result(&mut self, key: ResultKey, amplitudes: Vec<Complex64>) {
        self.results.insert(key, amplitudes);
    }

    pub fn clear(&mut self) {
        self.unitaries.clear();
        self.results.clear();
    }

    pub fn unitary_statistics(&self) -> CacheStatistics {
        self.unitaries.statistics()
    }

    pub fn result_statistics(&self) -> CacheStatistics {
        self.results.statistics()
    }
}
