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

//! Random: a hit is a no-op, the victim is a node at a uniformly random
//! list position reached by forward traversal from the head. The
//! traversal is O(n), but only runs on eviction, never on a hit.

use rand::RngCore;

use crate::index::OrderedIndex;

pub(crate) fn touch<V>(_index: &mut OrderedIndex<V>, _idx: usize) {}

pub(crate) fn pick_victim<V>(index: &OrderedIndex<V>, rng: &mut dyn RngCore) -> Option<usize> {
    let len = index.len();
    if len == 0 {
        return None;
    }
    let n = (rng.next_u32() as usize) % len;
    index.nth_from_head(n)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    fn key(bytes: &[u8]) -> Rc<[u8]> {
        Rc::from(bytes.to_vec().into_boxed_slice())
    }

    #[test]
    fn empty_index_has_no_victim() {
        let index: OrderedIndex<i32> = OrderedIndex::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(pick_victim(&index, &mut rng).is_none());
    }

    #[test]
    fn victim_is_always_a_live_member() {
        let mut index = OrderedIndex::new();
        for i in 0..8u64 {
            index.insert(key(&i.to_le_bytes()), i, 0, 1).unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let victim = pick_victim(&index, &mut rng).unwrap();
            assert!(*index.value(victim) < 8);
        }
    }
}
