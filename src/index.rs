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

//! The intrusive hash-plus-list container underlying the cache.
//!
//! A single arena slot backs both the hash index and the order list for
//! each entry, expressed as a `Vec<Option<Node<V>>>` with a free list
//! instead of a raw pointer graph — the usual way to get an intrusive
//! hash-plus-list structure in a language that disallows shared mutable
//! aliasing without `unsafe`.

use std::rc::Rc;

use hashbrown::HashMap;

use crate::node::{Envelope, Node, RemovedNode, NIL};

/// O(1) keyed access coupled with ordered traversal, with running aggregate
/// counters.
pub(crate) struct OrderedIndex<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    table: HashMap<Rc<[u8]>, usize, ahash::RandomState>,
    head: usize,
    tail: usize,
    item_count: usize,
    total_bytes: u64,
}

impl<V> OrderedIndex<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            table: HashMap::default(),
            head: NIL,
            tail: NIL,
            item_count: 0,
            total_bytes: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.item_count
    }

    pub(crate) fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub(crate) fn contains(&self, key: &[u8]) -> bool {
        self.table.contains_key(key)
    }

    pub(crate) fn lookup(&self, key: &[u8]) -> Option<usize> {
        self.table.get(key).copied()
    }

    pub(crate) fn head(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    pub(crate) fn next(&self, idx: usize) -> Option<usize> {
        let next = self.node(idx).next;
        (next != NIL).then_some(next)
    }

    pub(crate) fn key(&self, idx: usize) -> &[u8] {
        &self.node(idx).key
    }

    pub(crate) fn value(&self, idx: usize) -> &V {
        &self.node(idx).envelope.value
    }

    pub(crate) fn expires_at(&self, idx: usize) -> u64 {
        self.node(idx).envelope.expires_at
    }

    fn node(&self, idx: usize) -> &Node<V> {
        self.slots[idx].as_ref().expect("node index must be live")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        self.slots[idx].as_mut().expect("node index must be live")
    }

    /// Appends a new entry at the list tail and registers it in the index.
    /// Rejects duplicate keys without mutating any state.
    pub(crate) fn insert(&mut self, key: Rc<[u8]>, value: V, expires_at: u64, size: u64) -> Result<usize, ()> {
        if self.table.contains_key(&key[..]) {
            return Err(());
        }

        let idx = self.alloc_slot(Node {
            key: key.clone(),
            envelope: Envelope { value, expires_at },
            size,
            prev: NIL,
            next: NIL,
        });

        self.link_at_tail(idx);
        self.table.insert(key, idx);
        self.item_count += 1;
        self.total_bytes += size;

        Ok(idx)
    }

    fn alloc_slot(&mut self, node: Node<V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn link_at_tail(&mut self, idx: usize) {
        let old_tail = self.tail;
        {
            let node = self.node_mut(idx);
            node.prev = old_tail;
            node.next = NIL;
        }
        if old_tail != NIL {
            self.node_mut(old_tail).next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }

    fn link_at_head(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    /// Unlinks `idx` from the order list without touching the hash index or
    /// the counters. Used internally by the move/remove operations.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        if prev != NIL {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }
    }

    /// Unlinks and re-inserts `idx` at the list head. No-op if already
    /// there.
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.link_at_head(idx);
    }

    /// Unlinks and re-inserts `idx` at the list tail. No-op if already
    /// there.
    pub(crate) fn move_to_back(&mut self, idx: usize) {
        if self.tail == idx {
            return;
        }
        self.unlink(idx);
        self.link_at_tail(idx);
    }

    /// Unlinks `idx` from both structures, decrements the counters, and
    /// hands the owned node data back to the caller for the unified removal
    /// path to process.
    pub(crate) fn remove_node(&mut self, idx: usize) -> RemovedNode<V> {
        self.unlink(idx);
        let node = self.slots[idx].take().expect("node index must be live");
        self.table.remove(&node.key[..]);
        self.free.push(idx);
        self.item_count -= 1;
        self.total_bytes -= node.size;

        RemovedNode {
            key: node.key,
            value: node.envelope.value,
            size: node.size,
        }
    }

    /// Removes the list head, if any.
    pub(crate) fn pop_front(&mut self) -> Option<RemovedNode<V>> {
        self.head().map(|idx| self.remove_node(idx))
    }

    /// Removes the list tail, if any.
    pub(crate) fn pop_back(&mut self) -> Option<RemovedNode<V>> {
        (self.tail != NIL).then(|| self.remove_node(self.tail))
    }

    /// Returns the node reached by walking `n` steps forward from the head
    /// (0-indexed). Used by the Random eviction policy.
    pub(crate) fn nth_from_head(&self, n: usize) -> Option<usize> {
        let mut current = self.head();
        for _ in 0..n {
            current = current.and_then(|idx| self.next(idx));
        }
        current
    }

    /// Releases every node, resetting the counters.
    pub(crate) fn clear(&mut self) -> Vec<RemovedNode<V>> {
        let mut removed = Vec::with_capacity(self.item_count);
        while let Some(node) = self.pop_front() {
            removed.push(node);
        }
        removed
    }
}
