use crate::graph::INFINITE_COST;

/// Stable index of a [`PathNode`] inside the [`NodePool`](crate::pool::NodePool).
///
/// Indices stay valid until the pool is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A neighbour reference stored in the pool's adjacency cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodeCost {
    pub(crate) node: NodeId,
    pub(crate) cost: f32,
}

/// Per-state search record.
///
/// `cost_from_start`, `est_to_goal`, `total_cost`, `parent` and the
/// membership flags are only meaningful when `generation` equals the
/// solver's current generation. The adjacency fields survive across
/// generations until the pool is cleared.
#[derive(Debug, Clone)]
pub(crate) struct PathNode<S> {
    pub(crate) state: S,
    pub(crate) cost_from_start: f32,
    pub(crate) est_to_goal: f32,
    pub(crate) total_cost: f32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) generation: u64,

    /// Number of neighbours, `None` until the graph has been queried.
    pub(crate) num_adjacent: Option<u32>,
    /// Offset into the adjacency cache, `None` if not cached.
    pub(crate) cache_index: Option<u32>,

    /// Binary search tree links inside a hash bucket: `[less, greater]`.
    pub(crate) child: [Option<NodeId>; 2],
    /// Open list links. `None` stands for the list sentinel.
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,

    pub(crate) in_open: bool,
    pub(crate) in_closed: bool,
}

impl<S> PathNode<S> {
    /// Fresh node with no cached adjacency and no tree links.
    pub(crate) fn new(
        generation: u64,
        state: S,
        cost_from_start: f32,
        est_to_goal: f32,
        parent: Option<NodeId>,
    ) -> Self {
        let mut node = Self {
            state,
            cost_from_start,
            est_to_goal,
            total_cost: INFINITE_COST,
            parent,
            generation,
            num_adjacent: None,
            cache_index: None,
            child: [None, None],
            prev: None,
            next: None,
            in_open: false,
            in_closed: false,
        };
        node.calc_total_cost();
        node
    }

    /// Re-stamp the search fields for a new generation. Adjacency data and
    /// tree links are kept.
    pub(crate) fn init(
        &mut self,
        generation: u64,
        cost_from_start: f32,
        est_to_goal: f32,
        parent: Option<NodeId>,
    ) {
        self.cost_from_start = cost_from_start;
        self.est_to_goal = est_to_goal;
        self.calc_total_cost();
        self.parent = parent;
        self.generation = generation;
        self.prev = None;
        self.next = None;
        self.in_open = false;
        self.in_closed = false;
    }

    #[inline]
    pub(crate) fn calc_total_cost(&mut self) {
        self.total_cost = if self.cost_from_start < INFINITE_COST && self.est_to_goal < INFINITE_COST
        {
            self.cost_from_start + self.est_to_goal
        } else {
            INFINITE_COST
        };
    }
}
