//! Block allocator and state index for search nodes.
//!
//! Nodes live in fixed-size blocks. The first block is allocated up front and
//! never released; overflow blocks are dropped on [`NodePool::clear`]. A
//! power-of-two hash table maps a state to the root of an (unbalanced) binary
//! tree of nodes whose states share the bucket, ordered by `Ord`.
//!
//! Nodes are not reset between searches. Each carries the generation that last
//! touched it and is lazily re-stamped by [`NodePool::get_or_create`].

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::graph::State;
use crate::node::{NodeCost, NodeId, PathNode};

/// Smallest hash table: 8 buckets.
const MIN_HASH_SHIFT: u32 = 3;

pub(crate) struct NodePool<S> {
    blocks: Vec<Vec<PathNode<S>>>,
    nodes_per_block: usize,
    num_allocated: usize,

    hash_table: Vec<Option<NodeId>>,
    hash_mask: usize,

    neighbor_cache: Vec<NodeCost>,
    neighbor_cache_capacity: usize,

    // Buckets holding more than one node, summed over every clear.
    num_collisions: usize,
}

impl<S: State> NodePool<S> {
    /// Create a pool handing out `nodes_per_block` nodes per block, with an
    /// adjacency cache sized for `typical_adjacent` neighbours per node.
    pub(crate) fn new(nodes_per_block: usize, typical_adjacent: usize) -> Self {
        assert!(nodes_per_block > 0, "node pool needs a non-empty block");
        assert!(nodes_per_block < u32::MAX as usize, "node pool block too large");

        // If the caller sized the block to the whole state space, every state
        // should get its own bucket.
        let mut hash_shift = MIN_HASH_SHIFT;
        while (1usize << hash_shift) < nodes_per_block {
            hash_shift += 1;
        }
        let hash_size = 1usize << hash_shift;

        let neighbor_cache_capacity = nodes_per_block * typical_adjacent;

        Self {
            blocks: vec![Vec::with_capacity(nodes_per_block)],
            nodes_per_block,
            num_allocated: 0,
            hash_table: vec![None; hash_size],
            hash_mask: hash_size - 1,
            neighbor_cache: Vec::with_capacity(neighbor_cache_capacity),
            neighbor_cache_capacity,
            num_collisions: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Allocation
    // -----------------------------------------------------------------------

    /// Forget every node, drop overflow blocks and empty the hash table and
    /// the adjacency cache.
    ///
    /// Work is bounded by the first block and the hash table, never by the
    /// number of nodes allocated since the last clear.
    pub(crate) fn clear(&mut self) {
        if self.num_allocated > 0 {
            if log::log_enabled!(log::Level::Trace) {
                let collided = self
                    .hash_table
                    .iter()
                    .flatten()
                    .filter(|&&id| {
                        let child = self.node(id).child;
                        child[0].is_some() || child[1].is_some()
                    })
                    .count();
                self.num_collisions += collided;
                log::trace!(
                    "node pool clear: {} nodes, {} blocks, {}/{} buckets collided ({} total)",
                    self.num_allocated,
                    self.blocks.len(),
                    collided,
                    self.hash_table.len(),
                    self.num_collisions
                );
            }

            self.blocks.truncate(1);
            self.blocks[0].clear();
            self.hash_table.fill(None);
        }
        self.num_allocated = 0;
        self.neighbor_cache.clear();
    }

    fn alloc(&mut self, node: PathNode<S>) -> NodeId {
        let last_full = self
            .blocks
            .last()
            .is_none_or(|b| b.len() == self.nodes_per_block);
        if last_full {
            self.blocks.push(Vec::with_capacity(self.nodes_per_block));
            log::debug!(
                "node pool grew to {} blocks ({} nodes per block)",
                self.blocks.len(),
                self.nodes_per_block
            );
        }

        assert!(self.num_allocated < u32::MAX as usize, "node pool exhausted");
        let id = NodeId(self.num_allocated as u32);
        self.num_allocated += 1;

        let block = self.blocks.len() - 1;
        debug_assert_eq!(id.index() / self.nodes_per_block, block);
        self.blocks[block].push(node);
        id
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    #[inline]
    fn bucket(&self, state: &S) -> usize {
        let mut hasher = FxHasher::default();
        state.hash(&mut hasher);
        (hasher.finish() as usize) & self.hash_mask
    }

    /// The node for `state`, creating it if needed.
    ///
    /// A node stamped with an older generation is reinitialised with the
    /// given values. A node already on `generation` is returned untouched and
    /// the values are ignored.
    pub(crate) fn get_or_create(
        &mut self,
        generation: u64,
        state: S,
        cost_from_start: f32,
        est_to_goal: f32,
        parent: Option<NodeId>,
    ) -> NodeId {
        let bucket = self.bucket(&state);

        let mut cursor = self.hash_table[bucket];
        while let Some(id) = cursor {
            let node = self.node_mut(id);
            if node.state == state {
                if node.generation != generation {
                    node.init(generation, cost_from_start, est_to_goal, parent);
                }
                return id;
            }
            cursor = node.child[usize::from(state >= node.state)];
        }

        let id = self.alloc(PathNode::new(
            generation,
            state,
            cost_from_start,
            est_to_goal,
            parent,
        ));
        self.link(bucket, id, state);
        id
    }

    fn link(&mut self, bucket: usize, id: NodeId, state: S) {
        let Some(mut cursor) = self.hash_table[bucket] else {
            self.hash_table[bucket] = Some(id);
            return;
        };
        loop {
            let node = self.node_mut(cursor);
            let dir = usize::from(state >= node.state);
            match node.child[dir] {
                Some(next) => cursor = next,
                None => {
                    node.child[dir] = Some(id);
                    return;
                }
            }
        }
    }

    /// The node for `state`, if one has been created since the last clear.
    pub(crate) fn find(&self, state: S) -> Option<NodeId> {
        let mut cursor = self.hash_table[self.bucket(&state)];
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.state == state {
                return Some(id);
            }
            cursor = node.child[usize::from(state >= node.state)];
        }
        None
    }

    /// The node for a state the caller knows was created.
    ///
    /// # Panics
    ///
    /// If no node exists for `state`.
    pub(crate) fn fetch(&self, state: S) -> NodeId {
        match self.find(state) {
            Some(id) => id,
            None => panic!("node pool has no node for state {state:?}"),
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &PathNode<S> {
        let i = id.index();
        &self.blocks[i / self.nodes_per_block][i % self.nodes_per_block]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PathNode<S> {
        let i = id.index();
        &mut self.blocks[i / self.nodes_per_block][i % self.nodes_per_block]
    }

    // -----------------------------------------------------------------------
    // Adjacency cache
    // -----------------------------------------------------------------------

    /// Append a neighbour list to the cache and return its offset, or `None`
    /// (leaving the cache untouched) if it does not fit.
    pub(crate) fn push_cache(&mut self, nodes: &[NodeCost]) -> Option<u32> {
        if self.neighbor_cache.len() + nodes.len() > self.neighbor_cache_capacity {
            return None;
        }
        let start = self.neighbor_cache.len() as u32;
        self.neighbor_cache.extend_from_slice(nodes);
        Some(start)
    }

    /// Copy `count` cached neighbours starting at `index` into `out`.
    pub(crate) fn read_cache(&self, index: u32, count: u32, out: &mut Vec<NodeCost>) {
        let start = index as usize;
        let end = start + count as usize;
        assert!(count > 0 && end <= self.neighbor_cache.len());
        out.clear();
        out.extend_from_slice(&self.neighbor_cache[start..end]);
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Append every state whose node carries `generation`.
    pub(crate) fn all_states(&self, generation: u64, out: &mut Vec<S>) {
        out.extend(
            self.blocks
                .iter()
                .flatten()
                .filter(|n| n.generation == generation)
                .map(|n| n.state),
        );
    }

    pub(crate) fn len(&self) -> usize {
        self.num_allocated
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn hash_size(&self) -> usize {
        self.hash_table.len()
    }

    pub(crate) fn neighbor_cache_len(&self) -> usize {
        self.neighbor_cache.len()
    }
}
