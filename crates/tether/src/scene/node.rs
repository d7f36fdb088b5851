//! # Node Handles
//!
//! A [`NodeId`] is just a number. The [`Scene`](super::Scene) maps handles to
//! transforms and hierarchy links.
//!
//! Each slot index is paired with a **generation** counter. When a node is
//! despawned its slot generation is bumped before reuse, so components still
//! holding the old handle see it as dead instead of silently driving whatever
//! node was spawned into the recycled slot.
//!
//! ```text
//! NodeId { index: 5, generation: 0 }  ← original
//! NodeId { index: 5, generation: 1 }  ← after recycle
//! ```

use std::fmt;

/// A lightweight handle to a node in a [`Scene`](super::Scene).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index. Stable for the node's lifetime and used as
    /// the id in saved scene data.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation. Useful for diagnostics.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Manages node handle allocation and recycling.
///
/// ```text
/// generations: [0, 1, 0, 2, 0]   ← one generation per slot ever allocated
/// free_list:   [1, 3]             ← slots available for reuse
/// ```
pub(crate) struct NodeAllocator {
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl NodeAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate a handle, reusing a freed slot if one is available.
    pub fn allocate(&mut self) -> NodeId {
        if let Some(index) = self.free_list.pop() {
            // Generation was already bumped on deallocate.
            let generation = self.generations[index as usize];
            NodeId { index, generation }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Free a handle's slot. Returns `false` if the handle was already stale.
    pub fn deallocate(&mut self, node: NodeId) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        self.generations[node.index as usize] += 1;
        self.free_list.push(node.index);
        true
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.generations
            .get(node.index as usize)
            .is_some_and(|&generation| generation == node.generation)
    }

    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }
}
