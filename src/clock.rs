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

//! The injected time source.
//!
//! The engine never reads the wall clock directly; it holds a boxed closure
//! returning milliseconds. This keeps TTL arithmetic deterministic in tests
//! and avoids tying the core to any particular clock source.

use std::time::{SystemTime, UNIX_EPOCH};

/// A total function returning monotonically non-decreasing milliseconds.
///
/// The cache is robust to a clock that never advances (every entry with a
/// non-zero expiration is simply live forever) but assumes non-decreasing
/// time for scan correctness; it does not guard against time going
/// backwards.
pub type Clock = Box<dyn FnMut() -> u64>;

/// Milliseconds since the Unix epoch, saturating on clocks set before it.
pub fn system_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The default clock: reads the process' real-time clock on every call.
pub fn system_clock() -> Clock {
    Box::new(system_now_ms)
}

/// Converts a relative duration into a `ttl_ms` value accepted by
/// [`crate::cache::Cache::insert`].
///
/// Truncates to milliseconds; a zero-length duration means "no expiration",
/// since a non-positive relative TTL disables expiration (`Duration` itself
/// cannot represent a negative value).
pub fn ttl_from_duration(d: std::time::Duration) -> u64 {
    d.as_millis() as u64
}

/// Converts an absolute wall-clock target into an `expires_at_ms` stamp on
/// the internal clock, given simultaneous readings of the wall clock and the
/// internal clock.
///
/// A non-positive delta (the target is now or in the past) yields `1`,
/// meaning "already expired" relative to any future scan. This introduces a
/// skew equal to the time between the two clock readings; callers should
/// take both readings as close together as possible.
pub fn expires_at_from_instant(target_wall_ms: u64, wall_now_ms: u64, internal_now_ms: u64) -> u64 {
    let delta = target_wall_ms as i128 - wall_now_ms as i128;
    if delta <= 0 {
        return 1;
    }
    internal_now_ms.saturating_add(delta as u64)
}

/// A hand-advanced clock for deterministic tests: an explicit, per-test
/// collaborator standing in for the real-time clock.
///
/// ```
/// use cachekit::clock::ManualClock;
///
/// let clock = ManualClock::new(1_000);
/// let mut reader = clock.reader();
/// assert_eq!(reader(), 1_000);
/// clock.advance_to(2_000);
/// assert_eq!(reader(), 2_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<u64>>,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: std::rc::Rc::new(std::cell::Cell::new(now_ms)),
        }
    }

    /// Sets the clock forward (or backward, though the cache assumes
    /// non-decreasing time) to `now_ms`.
    pub fn advance_to(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Advances the clock by `delta_ms`.
    pub fn advance_by(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Builds a [`Clock`] closure reading this clock, suitable for
    /// [`crate::cache::CacheBuilder::clock`].
    pub fn reader(&self) -> impl FnMut() -> u64 {
        let now = self.now.clone();
        move || now.get()
    }
}
