// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifiers and the per-graph block id pool.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of slots the id pool starts with and grows by.
pub const POOL_CHUNK: usize = 100;

/// Small non-negative identifier for a block, unique within one graph.
///
/// Ids are recycled: once a block is deleted its id becomes available to the
/// next [`IdAllocator::allocate`] call.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub usize);

impl BlockId {
    /// Returns the raw index of this id in the pool.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for an edge. Edge ids are never persisted; they are handed out
/// monotonically and reset when the graph is cleared.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Which side of a block a connector sits on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
    /// Receives one edge from an upstream block.
    Input,
    /// Feeds any number of downstream blocks.
    Output,
}

/// Address of one connector: owning block, side, and position on that side.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ConnectorRef {
    /// Owning block.
    pub block: BlockId,
    /// Input or output side.
    pub direction: Direction,
    /// Index within the side's ordered connector list.
    pub index: usize,
}

impl ConnectorRef {
    /// Address of input connector `index` on `block`.
    #[must_use]
    pub fn input(block: BlockId, index: usize) -> Self {
        Self {
            block,
            direction: Direction::Input,
            index,
        }
    }

    /// Address of output connector `index` on `block`.
    #[must_use]
    pub fn output(block: BlockId, index: usize) -> Self {
        Self {
            block,
            direction: Direction::Output,
            index,
        }
    }
}

impl fmt::Display for ConnectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.direction {
            Direction::Input => "in",
            Direction::Output => "out",
        };
        write!(f, "{}.{side}[{}]", self.block, self.index)
    }
}

/// Pool of availability flags indexed by block id.
///
/// Allocation always picks the lowest available index, so id reuse is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    /// `true` when the id at that index is free.
    slots: Vec<bool>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates a pool with [`POOL_CHUNK`] available ids.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![true; POOL_CHUNK],
        }
    }

    /// Takes the lowest available id, growing the pool by [`POOL_CHUNK`]
    /// slots when it is exhausted.
    pub fn allocate(&mut self) -> BlockId {
        if let Some(index) = self.slots.iter().position(|free| *free) {
            self.slots[index] = false;
            return BlockId(index);
        }
        let index = self.slots.len();
        self.slots.resize(index + POOL_CHUNK, true);
        self.slots[index] = false;
        BlockId(index)
    }

    /// Makes `id` available again. Ids past the end of the pool are ignored.
    pub fn free(&mut self, id: BlockId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = true;
        }
    }

    /// Reserves a specific id (used when restoring a persisted graph).
    ///
    /// When `id` lies past the end of the pool the pool grows to
    /// `id + POOL_CHUNK` slots first.
    pub fn mark_used(&mut self, id: BlockId) {
        if id.0 >= self.slots.len() {
            self.slots.resize(id.0 + POOL_CHUNK, true);
        }
        self.slots[id.0] = false;
    }

    /// Discards all history and returns to [`POOL_CHUNK`] available ids.
    pub fn free_all(&mut self) {
        self.slots.clear();
        self.slots.resize(POOL_CHUNK, true);
    }

    /// Returns `true` when `id` would be handed out by a future allocation.
    /// Ids past the end of the pool count as available.
    #[must_use]
    pub fn is_available(&self, id: BlockId) -> bool {
        self.slots.get(id.0).copied().unwrap_or(true)
    }

    /// Current pool length (available and taken slots).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of ids currently taken.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|free| !**free).count()
    }
}
