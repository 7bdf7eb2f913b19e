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

//! The three built-in eviction policies.
//!
//! Each policy presents the same two operations against the [`OrderedIndex`]
//! — an on-hit "touch" and a victim selector — dispatched through a single
//! enum match rather than a function-pointer-plus-context pair, since the
//! set of policies is small and closed. Policies see only the index and
//! their own private state; they never touch envelopes, TTL, or counters
//! directly.

pub(crate) mod fifo;
pub(crate) mod lru;
pub(crate) mod random;

use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::index::OrderedIndex;

/// Which built-in policy a cache was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicyKind {
    Lru,
    Fifo,
    Random,
}

impl FromStr for EvictionPolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "fifo" => Ok(Self::Fifo),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Live policy state. LRU and FIFO carry none; Random owns the injected RNG.
pub(crate) enum EvictionPolicy {
    Lru,
    Fifo,
    Random { rng: Box<dyn RngCore> },
}

impl EvictionPolicy {
    pub(crate) fn new(kind: EvictionPolicyKind, rng: Box<dyn RngCore>) -> Self {
        match kind {
            EvictionPolicyKind::Lru => Self::Lru,
            EvictionPolicyKind::Fifo => Self::Fifo,
            EvictionPolicyKind::Random => Self::Random { rng },
        }
    }

    /// The policy-defined reordering applied on a successful, non-expired
    /// lookup.
    pub(crate) fn touch<V>(&mut self, index: &mut OrderedIndex<V>, idx: usize) {
        match self {
            Self::Lru => lru::touch(index, idx),
            Self::Fifo => fifo::touch(index, idx),
            Self::Random { .. } => random::touch(index, idx),
        }
    }

    /// Selects the node to evict for capacity enforcement, or `None` if the
    /// index is empty.
    pub(crate) fn pick_victim<V>(&mut self, index: &OrderedIndex<V>) -> Option<usize> {
        match self {
            Self::Lru => lru::pick_victim(index),
            Self::Fifo => fifo::pick_victim(index),
            Self::Random { rng } => random::pick_victim(index, rng.as_mut()),
        }
    }
}
