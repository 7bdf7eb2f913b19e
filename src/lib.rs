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

//! `cachekit` is a single-threaded, in-memory key-value cache that couples
//! O(1) keyed lookup with ordered traversal, TTL expiration, pluggable
//! eviction policies, and per-entry lifecycle hooks.
//!
//! The crate is organized leaves-first, mirroring how the cache is actually
//! assembled:
//!
//! - [`index`] — the intrusive hash-plus-list container ("the Ordered
//!   Index"): O(1) insert-if-absent, lookup, remove-by-node, and list
//!   manipulation, with running item-count and total-size counters.
//! - [`eviction`] — the three built-in eviction policies (LRU, FIFO,
//!   Random), each presenting an on-hit touch and a victim selector against
//!   the Ordered Index.
//! - [`cache`] — the engine that wraps the Ordered Index with TTL metadata,
//!   capacity limits, a time source, scan throttling, and hook dispatch.
//!
//! The cache is strictly single-threaded — there is no locking anywhere in
//! this crate — and the time source, RNG, and every lifecycle hook are
//! injected at construction rather than reached for globally.

pub mod cache;
pub mod clock;
pub mod error;
pub mod eviction;
pub mod hooks;
mod index;
mod node;

pub mod prelude {
    //! Re-exports of the types most callers need.

    pub use crate::cache::{Cache, CacheBuilder, CacheConfig};
    pub use crate::clock::{expires_at_from_instant, ttl_from_duration};
    pub use crate::error::{ConfigError, InsertError};
    pub use crate::eviction::EvictionPolicyKind;
}
