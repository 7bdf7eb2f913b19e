//  Copyright 2024 Foyer Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! The cache engine: wraps the [`OrderedIndex`] with TTL metadata, capacity
//! limits, scan throttling, and hook dispatch.

use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::{system_clock, Clock};
use crate::error::InsertError;
use crate::eviction::{EvictionPolicy, EvictionPolicyKind};
use crate::hooks::Hooks;
use crate::index::OrderedIndex;
use crate::node::RemovedNode;

/// Construction-time configuration for a [`Cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub eviction_policy: EvictionPolicyKind,
    /// Capacity by item count. `0` disables the limit.
    pub max_items: u64,
    /// Capacity by accounted size. `0` disables the limit.
    pub max_bytes: u64,
    /// Throttle for `maybe_scan_and_evict`. `0` means "always scan".
    pub scan_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            eviction_policy: EvictionPolicyKind::Lru,
            max_items: 0,
            max_bytes: 0,
            scan_interval_ms: 0,
        }
    }
}

/// Builds a [`Cache`], wiring in the optional clock, hooks, and RNG a host
/// binding may want to override for determinism or custom allocation.
pub struct CacheBuilder<V> {
    config: CacheConfig,
    clock: Clock,
    hooks: Hooks<V>,
    rng: Box<dyn rand::RngCore>,
}

impl<V> Default for CacheBuilder<V> {
    fn default() -> Self {
        Self {
            config: CacheConfig::default(),
            clock: system_clock(),
            hooks: Hooks::default(),
            rng: Box::new(SmallRng::from_entropy()),
        }
    }
}

impl<V> CacheBuilder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn eviction_policy(mut self, policy: EvictionPolicyKind) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    /// Recognizes a policy name (`"lru"`, `"fifo"`, `"random"`,
    /// case-insensitive) the way a config file or CLI flag would supply it.
    pub fn policy(self, name: &str) -> Result<Self, crate::error::ConfigError> {
        let policy = name.parse()?;
        Ok(self.eviction_policy(policy))
    }

    pub fn max_items(mut self, max_items: u64) -> Self {
        self.config.max_items = max_items;
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    pub fn scan_interval_ms(mut self, scan_interval_ms: u64) -> Self {
        self.config.scan_interval_ms = scan_interval_ms;
        self
    }

    /// Overrides the time source. The supplied closure must be total and
    /// return non-decreasing milliseconds.
    pub fn clock(mut self, clock: impl FnMut() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Overrides the RNG backing the Random policy.
    pub fn rng(mut self, rng: impl rand::RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn key_alloc_hook(mut self, hook: impl FnMut(&[u8]) -> Option<Box<[u8]>> + 'static) -> Self {
        self.hooks.key_alloc = Some(Box::new(hook));
        self
    }

    pub fn key_release_hook(mut self, hook: impl FnMut(&[u8]) + 'static) -> Self {
        self.hooks.key_release = Some(Box::new(hook));
        self
    }

    pub fn value_alloc_hook(mut self, hook: impl FnMut(V) -> Option<V> + 'static) -> Self {
        self.hooks.value_alloc = Some(Box::new(hook));
        self
    }

    pub fn value_release_hook(mut self, hook: impl FnMut(V) + 'static) -> Self {
        self.hooks.value_release = Some(Box::new(hook));
        self
    }

    pub fn removal_listener(mut self, listener: impl FnMut(&[u8], &V, u64) + 'static) -> Self {
        self.hooks.removal_listener = Some(Box::new(listener));
        self
    }

    pub fn build(self) -> Cache<V> {
        Cache {
            index: OrderedIndex::new(),
            policy: EvictionPolicy::new(self.config.eviction_policy, self.rng),
            hooks: self.hooks,
            clock: self.clock,
            max_items: self.config.max_items,
            max_bytes: self.config.max_bytes,
            scan_interval_ms: self.config.scan_interval_ms,
            last_scan: 0,
        }
    }
}

/// The single-threaded ordered cache engine.
pub struct Cache<V> {
    index: OrderedIndex<V>,
    policy: EvictionPolicy,
    hooks: Hooks<V>,
    clock: Clock,

    max_items: u64,
    max_bytes: u64,
    scan_interval_ms: u64,
    last_scan: u64,
}

impl<V> Cache<V> {
    pub fn builder() -> CacheBuilder<V> {
        CacheBuilder::default()
    }

    /// Current number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Current accounted total size.
    pub fn total_bytes(&self) -> u64 {
        self.index.total_bytes()
    }

    fn now(&mut self) -> u64 {
        (self.clock)()
    }

    /// Inserts a new entry. `ttl_ms` wins over `expires_at_ms` when both are
    /// non-zero; if both are zero the entry never expires. Capacity
    /// enforcement runs immediately after a successful insert and may evict
    /// entries, possibly including the one just inserted.
    pub fn insert(
        &mut self,
        key: &[u8],
        value: V,
        size: u64,
        ttl_ms: u64,
        expires_at_ms: u64,
    ) -> Result<(), InsertError> {
        if key.is_empty() {
            return Err(InsertError::EmptyKey);
        }
        if self.index.contains(key) {
            return Err(InsertError::Duplicate);
        }

        let now = self.now();
        let expires_at = if ttl_ms > 0 {
            now.saturating_add(ttl_ms)
        } else if expires_at_ms > 0 {
            expires_at_ms
        } else {
            0
        };

        let key_box = match self.hooks.alloc_key(key) {
            Some(k) => k,
            None => return Err(InsertError::Allocation),
        };

        let value = match self.hooks.alloc_value(value) {
            Some(v) => v,
            None => {
                self.hooks.release_key(&key_box[..]);
                return Err(InsertError::Allocation);
            }
        };

        let key_rc: Rc<[u8]> = Rc::from(key_box);
        self.index
            .insert(key_rc, value, expires_at, size)
            .expect("duplicate already checked above");

        trace!(size, ttl_ms, expires_at, "inserted entry");

        self.enforce_capacity();
        Ok(())
    }

    /// Returns the value if present and not expired. On hit, runs the
    /// policy's touch. On encountering an expired entry, removes it inline
    /// and reports absent.
    pub fn lookup(&mut self, key: &[u8]) -> Option<&V> {
        let idx = self.index.lookup(key)?;
        let now = self.now();
        if self.is_expired(idx, now) {
            debug!("lookup found expired entry, removing inline");
            self.unified_remove(idx);
            return None;
        }
        self.policy.touch(&mut self.index, idx);
        Some(self.index.value(idx))
    }

    /// Unified removal by key. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.index.lookup(key) {
            Some(idx) => {
                self.unified_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every expired entry, then enforces capacity until satisfied
    /// or the policy yields no further victim.
    pub fn scan_and_evict(&mut self) {
        let now = self.now();
        let mut current = self.index.head();
        while let Some(idx) = current {
            // Capture the successor before a potential deletion: removing
            // `idx` only touches its neighbors' links, never `next`'s own
            // slot, so this index stays valid to resume from regardless of
            // how the list gets reshaped.
            let next = self.index.next(idx);
            if self.is_expired(idx, now) {
                self.unified_remove(idx);
            }
            current = next;
        }
        self.enforce_capacity();
        self.last_scan = now;
    }

    /// Runs `scan_and_evict` only if the configured throttle permits.
    pub fn maybe_scan_and_evict(&mut self) {
        let now = self.now();
        let should_scan =
            self.scan_interval_ms == 0 || self.last_scan == 0 || now.saturating_sub(self.last_scan) >= self.scan_interval_ms;
        if should_scan {
            self.scan_and_evict();
        }
    }

    /// Removes every entry, invoking the notification hook for each.
    pub fn clear(&mut self) {
        let removed = self.index.clear();
        debug!(count = removed.len(), "cleared cache");
        for node in removed {
            self.notify_and_release(node);
        }
    }

    /// Equivalent to `clear`, consuming the cache. There is no separate
    /// resource to release beyond the entries themselves.
    pub fn destroy(mut self) {
        self.clear();
    }

    fn is_expired(&self, idx: usize, now: u64) -> bool {
        let expires_at = self.index.expires_at(idx);
        expires_at != 0 && expires_at <= now
    }

    fn unified_remove(&mut self, idx: usize) {
        let node = self.index.remove_node(idx);
        self.notify_and_release(node);
    }

    fn notify_and_release(&mut self, node: RemovedNode<V>) {
        self.hooks.notify_removed(&node.key[..], &node.value, node.size);
        self.hooks.release_key(&node.key[..]);
        self.hooks.release_value(node.value);
    }

    fn enforce_capacity(&mut self) {
        loop {
            let over_items = self.max_items > 0 && self.index.len() as u64 > self.max_items;
            let over_bytes = self.max_bytes > 0 && self.index.total_bytes() > self.max_bytes;
            if !over_items && !over_bytes {
                break;
            }
            let Some(victim) = self.policy.pick_victim(&self.index) else {
                break;
            };
            trace!("evicting victim for capacity enforcement");
            self.unified_remove(victim);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc as StdRc;

    use super::*;

    fn clock_at(now: StdRc<RefCell<u64>>) -> impl FnMut() -> u64 {
        move || *now.borrow()
    }

    #[test]
    fn policy_name_is_recognized_case_insensitively() {
        let cache: Cache<i32> = Cache::builder().policy("FIFO").unwrap().build();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn unrecognized_policy_name_is_a_config_error() {
        assert!(CacheBuilder::<i32>::new().policy("lfu").is_err());
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let mut cache: Cache<&'static str> = Cache::builder().build();
        cache.insert(b"a", "hello", 5, 0, 0).unwrap();
        assert_eq!(cache.lookup(b"a"), Some(&"hello"));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut cache: Cache<i32> = Cache::builder().build();
        cache.insert(b"a", 1, 1, 0, 0).unwrap();
        assert_eq!(cache.insert(b"a", 2, 1, 0, 0), Err(InsertError::Duplicate));
        assert_eq!(cache.lookup(b"a"), Some(&1));
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut cache: Cache<i32> = Cache::builder().build();
        assert_eq!(cache.insert(b"", 1, 1, 0, 0), Err(InsertError::EmptyKey));
    }

    #[test]
    fn remove_then_remove_again() {
        let mut cache: Cache<i32> = Cache::builder().build();
        cache.insert(b"a", 1, 1, 0, 0).unwrap();
        assert!(cache.remove(b"a"));
        assert!(!cache.remove(b"a"));
    }

    #[test]
    fn clear_resets_counters_and_notifies_each_entry_once() {
        let seen = StdRc::new(RefCell::new(Vec::new()));
        let seen_in_hook = seen.clone();
        let mut cache: Cache<i32> = Cache::builder()
            .removal_listener(move |key, value, _size| {
                seen_in_hook.borrow_mut().push((key.to_vec(), *value));
            })
            .build();

        cache.insert(b"a", 1, 1, 0, 0).unwrap();
        cache.insert(b"b", 2, 1, 0, 0).unwrap();
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_bytes(), 0);

        cache.clear();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn lru_evicts_least_recently_used_under_item_cap() {
        let mut cache: Cache<&'static str> = Cache::builder()
            .eviction_policy(crate::eviction::EvictionPolicyKind::Lru)
            .max_items(3)
            .build();

        cache.insert(b"a", "a", 1, 0, 0).unwrap();
        cache.insert(b"b", "b", 1, 0, 0).unwrap();
        cache.insert(b"c", "c", 1, 0, 0).unwrap();
        cache.insert(b"d", "d", 1, 0, 0).unwrap();

        assert!(cache.lookup(b"a").is_none());
        assert_eq!(cache.lookup(b"b"), Some(&"b"));
        assert_eq!(cache.lookup(b"c"), Some(&"c"));
        assert_eq!(cache.lookup(b"d"), Some(&"d"));
    }

    #[test]
    fn ttl_expires_via_lookup_and_notifies_once() {
        let now = StdRc::new(RefCell::new(1_000u64));
        let notified = StdRc::new(RefCell::new(0));
        let notified_in_hook = notified.clone();

        let mut cache: Cache<&'static str> = Cache::builder()
            .clock(clock_at(now.clone()))
            .removal_listener(move |_, _, _| *notified_in_hook.borrow_mut() += 1)
            .build();

        cache.insert(b"k", "v", 1, 5_000, 0).unwrap();
        *now.borrow_mut() = 6_001;

        assert!(cache.lookup(b"k").is_none());
        assert_eq!(cache.len(), 0);
        assert_eq!(*notified.borrow(), 1);
    }

    #[test]
    fn ttl_wins_over_absolute_expiration() {
        let now = StdRc::new(RefCell::new(1_000u64));
        let mut cache: Cache<&'static str> = Cache::builder().clock(clock_at(now.clone())).build();

        cache.insert(b"k", "v", 1, 2_000, 10_000).unwrap();

        *now.borrow_mut() = 2_500;
        assert_eq!(cache.lookup(b"k"), Some(&"v"));

        *now.borrow_mut() = 3_500;
        assert!(cache.lookup(b"k").is_none());
    }

    #[test]
    fn value_allocation_failure_unwinds_the_key_allocation() {
        let released = StdRc::new(RefCell::new(Vec::new()));
        let released_in_hook = released.clone();

        let mut cache: Cache<i32> = Cache::builder()
            .key_release_hook(move |k| released_in_hook.borrow_mut().push(k.to_vec()))
            .value_alloc_hook(|_v| None)
            .build();

        assert_eq!(cache.insert(b"a", 1, 1, 0, 0), Err(InsertError::Allocation));
        assert_eq!(cache.len(), 0);
        assert_eq!(released.borrow().as_slice(), [b"a".to_vec()]);
    }

    #[test]
    fn byte_cap_evicts_oldest_to_stay_under_budget() {
        let mut cache: Cache<&'static str> = Cache::builder()
            .eviction_policy(crate::eviction::EvictionPolicyKind::Lru)
            .max_bytes(10)
            .build();

        cache.insert(b"a", "a", 4, 0, 0).unwrap();
        cache.insert(b"b", "b", 4, 0, 0).unwrap();
        cache.insert(b"c", "c", 4, 0, 0).unwrap();

        assert!(cache.lookup(b"a").is_none());
        assert_eq!(cache.total_bytes(), 8);
    }

    #[test]
    fn zero_caps_disable_eviction_entirely() {
        let mut cache: Cache<i32> = Cache::builder().build();
        for i in 0..100u64 {
            cache.insert(&i.to_le_bytes(), i as i32, 1, 0, 0).unwrap();
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn maybe_scan_and_evict_respects_throttle() {
        let now = StdRc::new(RefCell::new(1_000u64));
        let notifications = StdRc::new(RefCell::new(0));
        let notifications_in_hook = notifications.clone();

        let mut cache: Cache<&'static str> = Cache::builder()
            .clock(clock_at(now.clone()))
            .scan_interval_ms(1_000)
            .removal_listener(move |_, _, _| *notifications_in_hook.borrow_mut() += 1)
            .build();

        // The first call always scans (no scan has run yet); nothing is
        // expired yet, so this just establishes `last_scan`.
        cache.maybe_scan_and_evict();

        cache.insert(b"k", "v", 1, 100, 0).unwrap();

        *now.borrow_mut() = 1_050;
        cache.maybe_scan_and_evict();
        assert_eq!(cache.len(), 1, "throttle should have suppressed this scan");

        *now.borrow_mut() = 2_050;
        cache.maybe_scan_and_evict();
        assert_eq!(cache.len(), 0);
        assert_eq!(*notifications.borrow(), 1);
    }
}
