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

//! Least-recently-used: a hit moves the node to the list tail, the victim
//! is always the list head (the entry touched longest ago).

use crate::index::OrderedIndex;

pub(crate) fn touch<V>(index: &mut OrderedIndex<V>, idx: usize) {
    index.move_to_back(idx);
}

pub(crate) fn pick_victim<V>(index: &OrderedIndex<V>) -> Option<usize> {
    index.head()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn key(bytes: &[u8]) -> Rc<[u8]> {
        Rc::from(bytes.to_vec().into_boxed_slice())
    }

    #[test]
    fn hit_promotes_to_tail_so_head_is_least_recently_used() {
        let mut index = OrderedIndex::new();
        index.insert(key(b"a"), 1, 0, 1).unwrap();
        index.insert(key(b"b"), 2, 0, 1).unwrap();
        index.insert(key(b"c"), 3, 0, 1).unwrap();

        let a = index.lookup(b"a").unwrap();
        touch(&mut index, a);

        let victim = pick_victim(&index).unwrap();
        assert_eq!(*index.value(victim), 2);
    }
}
