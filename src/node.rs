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

use std::rc::Rc;

/// Sentinel slot index meaning "no node" — the arena equivalent of a null
/// link. Chosen so `Node` stays a plain `usize` pair with no `Option`
/// indirection on the hot path.
pub(crate) const NIL: usize = usize::MAX;

/// The per-entry wrapper carrying the user value and its absolute
/// expiration timestamp in milliseconds. `0` means "never expires".
#[derive(Debug)]
pub(crate) struct Envelope<V> {
    pub(crate) value: V,
    pub(crate) expires_at: u64,
}

/// A node owned by the ordered index's arena.
///
/// The key is `Rc<[u8]>` rather than `Box<[u8]>` so the same allocation can
/// be shared between the node and the hash index's key without aliasing
/// through a raw pointer and without a second copy.
pub(crate) struct Node<V> {
    pub(crate) key: Rc<[u8]>,
    pub(crate) envelope: Envelope<V>,
    pub(crate) size: u64,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

/// A node after it has left both the hash index and the order list, handed
/// back to the cache engine so it can run the unified removal path (notify,
/// then release hooks) before the value is finally dropped.
pub(crate) struct RemovedNode<V> {
    pub(crate) key: Rc<[u8]>,
    pub(crate) value: V,
    pub(crate) size: u64,
}
