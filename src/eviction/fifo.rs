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

//! First-in-first-out: a hit is a no-op, the victim is always the list
//! head (the oldest insertion still present).

use crate::index::OrderedIndex;

pub(crate) fn touch<V>(_index: &mut OrderedIndex<V>, _idx: usize) {}

pub(crate) fn pick_victim<V>(index: &OrderedIndex<V>) -> Option<usize> {
    index.head()
}
