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

//! Optional collaborators a host binding can plug in at construction time.
//!
//! When a hook is left unset the cache falls back to plain Rust ownership:
//! keys are copied with `to_vec`, values are stored as handed to `insert`,
//! and release is simply letting the value drop. A configured hook stands
//! in for a host allocator and may fail (return `None`) to simulate an
//! out-of-memory condition on that side.

/// Allocates the cache's own copy of the key bytes. `None` signals
/// allocation failure, propagated as [`crate::error::InsertError::Allocation`].
pub type KeyAllocHook = Box<dyn FnMut(&[u8]) -> Option<Box<[u8]>>>;

/// Observes the key bytes as a node is dismantled, before the underlying
/// allocation is actually freed.
pub type KeyReleaseHook = Box<dyn FnMut(&[u8])>;

/// Allocates the cache's own copy of the value. `None` signals allocation
/// failure. Called after the key has already been allocated — on failure
/// here, the key allocation is unwound via `key_release` before the insert
/// returns.
pub type ValueAllocHook<V> = Box<dyn FnMut(V) -> Option<V>>;

/// Consumes the value as a node is dismantled. Left unset, the value is
/// simply dropped.
pub type ValueReleaseHook<V> = Box<dyn FnMut(V)>;

/// Called exactly once per removed entry, before the key/value release
/// hooks run, with the key, value, and size still live.
pub type RemovalListener<V> = Box<dyn FnMut(&[u8], &V, u64)>;

/// The four optional memory hooks plus the removal listener, grouped
/// together since they are all configured once at construction and never
/// change for the lifetime of the cache.
#[derive(Default)]
pub(crate) struct Hooks<V> {
    pub(crate) key_alloc: Option<KeyAllocHook>,
    pub(crate) key_release: Option<KeyReleaseHook>,
    pub(crate) value_alloc: Option<ValueAllocHook<V>>,
    pub(crate) value_release: Option<ValueReleaseHook<V>>,
    pub(crate) removal_listener: Option<RemovalListener<V>>,
}

impl<V> Hooks<V> {
    pub(crate) fn alloc_key(&mut self, src: &[u8]) -> Option<Box<[u8]>> {
        match &mut self.key_alloc {
            Some(hook) => hook(src),
            None => Some(src.to_vec().into_boxed_slice()),
        }
    }

    pub(crate) fn release_key(&mut self, key: &[u8]) {
        if let Some(hook) = &mut self.key_release {
            hook(key);
        }
    }

    pub(crate) fn alloc_value(&mut self, value: V) -> Option<V> {
        match &mut self.value_alloc {
            Some(hook) => hook(value),
            None => Some(value),
        }
    }

    pub(crate) fn release_value(&mut self, value: V) {
        match &mut self.value_release {
            Some(hook) => hook(value),
            None => drop(value),
        }
    }

    pub(crate) fn notify_removed(&mut self, key: &[u8], value: &V, size: u64) {
        if let Some(listener) = &mut self.removal_listener {
            listener(key, value, size);
        }
    }
}
