use std::mem;

use crate::cache::{CacheProbe, PathCache};
use crate::closed::ClosedSet;
use crate::config::{ConfigError, PatherConfig};
use crate::graph::{Graph, INFINITE_COST, StateCost};
use crate::node::{NodeCost, NodeId};
use crate::open::OpenQueue;
use crate::pool::NodePool;

/// Outcome of [`Pather::solve`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Solution<S> {
    /// `path` runs from the start state to the end state, both included.
    Solved { path: Vec<S>, cost: f32 },
    NoSolution,
    /// Start and end are the same state; nothing was searched.
    StartEndSame,
}

impl<S> Solution<S> {
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    /// The path, if one was found.
    pub fn path(&self) -> Option<&[S]> {
        match self {
            Self::Solved { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Total cost: the path cost when solved, 0 when start equals end.
    pub fn cost(&self) -> Option<f32> {
        match self {
            Self::Solved { cost, .. } => Some(*cost),
            Self::StartEndSame => Some(0.0),
            Self::NoSolution => None,
        }
    }
}

/// Path cache statistics, see [`Pather::cache_data`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheData {
    pub bytes_allocated: usize,
    pub bytes_used: usize,
    pub memory_fraction: f32,
    pub hits: u32,
    pub misses: u32,
    pub hit_fraction: f32,
}

/// Node pool occupancy, see [`Pather::pool_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolData {
    pub nodes: usize,
    pub blocks: usize,
    pub hash_buckets: usize,
    pub cached_adjacent: usize,
}

// ---------------------------------------------------------------------------
// Pather
// ---------------------------------------------------------------------------

/// A* solver over a [`Graph`].
///
/// `Pather` owns its node pool and path cache so that repeated queries reuse
/// memory, and so that adjacency discovered by one search serves the next.
/// Both assume the graph does not change: mutate it through
/// [`update_graph`](Self::update_graph), or call [`reset`](Self::reset)
/// whenever costs or connections change behind the pather's back.
pub struct Pather<G: Graph> {
    graph: G,
    config: PatherConfig,
    pool: NodePool<G::State>,
    cache: Option<PathCache<G::State>>,
    // Bumped once per search; lazily invalidates every pool node.
    generation: u64,

    // Scratch buffers reused across searches.
    state_costs: Vec<StateCost<G::State>>,
    node_costs: Vec<NodeCost>,
    edge_costs: Vec<f32>,
}

impl<G: Graph> Pather<G> {
    /// Create a pather with the default [`PatherConfig`].
    pub fn new(graph: G) -> Self {
        Self::build(graph, PatherConfig::default())
    }

    /// Create a pather with explicit tuning.
    pub fn with_config(graph: G, config: PatherConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(graph, config))
    }

    fn build(graph: G, config: PatherConfig) -> Self {
        let cache = config
            .use_cache
            .then(|| PathCache::new(config.effective_cache_capacity()));
        Self {
            graph,
            config,
            pool: NodePool::new(config.nodes_per_block, config.typical_adjacent),
            cache,
            generation: 0,
            state_costs: Vec::with_capacity(config.typical_adjacent),
            node_costs: Vec::with_capacity(config.typical_adjacent),
            edge_costs: Vec::new(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &G {
        &self.graph
    }

    #[inline]
    pub fn config(&self) -> &PatherConfig {
        &self.config
    }

    /// Number of searches run since the last reset.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Mutate the graph, then [`reset`](Self::reset) so no stale adjacency or
    /// cached path survives the change.
    pub fn update_graph<R>(&mut self, f: impl FnOnce(&mut G) -> R) -> R {
        let r = f(&mut self.graph);
        self.reset();
        r
    }

    /// Forget every node, cached adjacency and cached path.
    ///
    /// Must be called whenever the cost or the connection between states
    /// changes. Also releases pool memory beyond the first block.
    pub fn reset(&mut self) {
        self.pool.clear();
        if let Some(cache) = &mut self.cache {
            cache.reset();
        }
        self.generation = 0;
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Find the cheapest path from `start` to `end`.
    pub fn solve(&mut self, start: G::State, end: G::State) -> Solution<G::State> {
        if start == end {
            return Solution::StartEndSame;
        }

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "solve {} -> {}",
                self.graph.describe_state(start),
                self.graph.describe_state(end)
            );
        }

        if let Some(cache) = &mut self.cache {
            let mut path = Vec::new();
            match cache.solve(start, end, &mut path) {
                CacheProbe::Solved(cost) => {
                    log::debug!("path cache hit: solved, {} states, cost {cost:.1}", path.len());
                    return Solution::Solved { path, cost };
                }
                CacheProbe::NoSolution => {
                    log::debug!("path cache hit: no solution");
                    return Solution::NoSolution;
                }
                CacheProbe::NotCached => log::debug!("path cache miss"),
            }
        }

        self.generation += 1;
        let generation = self.generation;

        let mut open = OpenQueue::new();
        let mut closed = ClosedSet;

        let estimate = self.graph.least_cost_estimate(start, end);
        let start_id = self.pool.get_or_create(generation, start, 0.0, estimate, None);
        // An infinite estimate declares the goal unreachable.
        if estimate < INFINITE_COST {
            open.push(&mut self.pool, start_id);
        }

        let mut neighbors = mem::take(&mut self.node_costs);

        let goal = 'search: loop {
            if open.is_empty() {
                break 'search None;
            }
            let id = open.pop(&mut self.pool);
            if self.pool.node(id).state == end {
                break 'search Some(id);
            }

            closed.add(&mut self.pool, id);
            self.node_neighbors(id, &mut neighbors);
            let cost_from_start = self.pool.node(id).cost_from_start;

            for &NodeCost { node: child, cost } in neighbors.iter() {
                // Not actually a neighbour.
                if cost >= INFINITE_COST {
                    continue;
                }
                debug_assert_ne!(child, id);
                let new_cost = cost_from_start + cost;

                let n = self.pool.node(child);
                let (in_open, in_closed) = (n.in_open, n.in_closed);
                debug_assert!(!(in_open && in_closed));
                if (in_open || in_closed) && new_cost >= n.cost_from_start {
                    continue;
                }

                let est_to_goal = self.graph.least_cost_estimate(n.state, end);
                // Overflowed sums and unreachable estimates never enter the queue.
                if !(new_cost + est_to_goal).is_finite() {
                    continue;
                }
                let n = self.pool.node_mut(child);
                n.parent = Some(id);
                n.cost_from_start = new_cost;
                n.est_to_goal = est_to_goal;
                n.calc_total_cost();

                if in_open {
                    open.update(&mut self.pool, child);
                } else {
                    // A cheaper route into an expanded node: expand it again
                    // so its descendants pick up the lower cost.
                    if in_closed {
                        closed.remove(&mut self.pool, child);
                    }
                    open.push(&mut self.pool, child);
                }
            }
        };

        self.node_costs = neighbors;

        match goal {
            Some(goal) => {
                let cost = self.pool.node(goal).cost_from_start;
                let path = self.goal_reached(goal, start, end);
                log::debug!("solved: {} states, cost {cost:.1}", path.len());
                Solution::Solved { path, cost }
            }
            None => {
                log::debug!("no solution after generation {generation}");
                if let Some(cache) = &mut self.cache {
                    cache.add_no_solution(end, &[start]);
                }
                Solution::NoSolution
            }
        }
    }

    /// Every state reachable from `start` for at most `max_cost`, with the
    /// exact cost of reaching it, in order of increasing cost.
    ///
    /// `start` itself is included at cost 0 (when `max_cost >= 0`).
    pub fn solve_for_near_states(
        &mut self,
        start: G::State,
        max_cost: f32,
    ) -> Vec<StateCost<G::State>> {
        self.generation += 1;
        let generation = self.generation;

        let mut open = OpenQueue::new();
        let mut closed = ClosedSet;
        let mut visited: Vec<NodeId> = Vec::new();

        let start_id = self.pool.get_or_create(generation, start, 0.0, 0.0, None);
        open.push(&mut self.pool, start_id);

        let mut neighbors = mem::take(&mut self.node_costs);

        while !open.is_empty() {
            let id = open.pop(&mut self.pool);
            closed.add(&mut self.pool, id);
            visited.push(id);

            let node = self.pool.node(id);
            if node.total_cost > max_cost {
                // Too far away to expand.
                continue;
            }
            let cost_from_start = node.cost_from_start;

            self.node_neighbors(id, &mut neighbors);
            for &NodeCost { node: child, cost } in neighbors.iter() {
                if cost >= INFINITE_COST {
                    continue;
                }
                let new_cost = cost_from_start + cost;
                if !new_cost.is_finite() {
                    continue;
                }

                let n = self.pool.node_mut(child);
                let (in_open, in_closed) = (n.in_open, n.in_closed);
                debug_assert!(!(in_open && in_closed));
                if (in_open || in_closed) && n.cost_from_start <= new_cost {
                    continue;
                }

                n.parent = Some(id);
                n.cost_from_start = new_cost;
                n.est_to_goal = 0.0;
                n.total_cost = new_cost;

                if in_open {
                    open.update(&mut self.pool, child);
                } else if !in_closed {
                    open.push(&mut self.pool, child);
                }
            }
        }

        self.node_costs = neighbors;

        let near: Vec<_> = visited
            .into_iter()
            .map(|id| self.pool.node(id))
            .filter(|n| n.total_cost <= max_cost)
            .map(|n| StateCost::new(n.state, n.total_cost))
            .collect();
        log::debug!("{} states within {max_cost:.1}", near.len());
        near
    }

    /// Neighbours of `id` as pool nodes, from the adjacency cache when
    /// possible. Every returned node is stamped with the current generation.
    fn node_neighbors(&mut self, id: NodeId, out: &mut Vec<NodeCost>) {
        let generation = self.generation;
        let node = self.pool.node(id);

        match (node.num_adjacent, node.cache_index) {
            (Some(0), _) => out.clear(),
            (Some(count), Some(index)) => {
                self.pool.read_cache(index, count, out);
                // Cached neighbours may still carry data from older searches.
                for nc in out.iter() {
                    let n = self.pool.node_mut(nc.node);
                    if n.generation != generation {
                        n.init(generation, INFINITE_COST, INFINITE_COST, None);
                    }
                }
            }
            _ => {
                // Never queried, or did not fit in the cache last time.
                let state = node.state;
                self.state_costs.clear();
                self.graph.adjacent_cost(state, &mut self.state_costs);

                out.clear();
                for sc in &self.state_costs {
                    debug_assert_ne!(sc.state, state, "a state cannot be its own neighbour");
                    let child = self.pool.get_or_create(
                        generation,
                        sc.state,
                        INFINITE_COST,
                        INFINITE_COST,
                        None,
                    );
                    out.push(NodeCost {
                        node: child,
                        cost: sc.cost,
                    });
                }

                let cache_index = if out.is_empty() {
                    None
                } else {
                    let index = self.pool.push_cache(out);
                    if index.is_none() {
                        log::debug!("adjacency cache full, {state:?} will be re-queried");
                    }
                    index
                };
                let node = self.pool.node_mut(id);
                node.num_adjacent = Some(out.len() as u32);
                node.cache_index = cache_index;
            }
        }
    }

    /// Rebuild the path ending at `goal` and feed it to the path cache.
    fn goal_reached(&mut self, goal: NodeId, start: G::State, end: G::State) -> Vec<G::State> {
        let parent = self.pool.node(goal).parent;
        let direct = parent.is_none_or(|p| self.pool.node(p).parent.is_none());

        let path = if direct {
            vec![start, end]
        } else {
            let mut path = Vec::new();
            let mut cursor = Some(goal);
            while let Some(id) = cursor {
                let node = self.pool.node(id);
                path.push(node.state);
                cursor = node.parent;
            }
            path.reverse();
            debug_assert_eq!(path.first(), Some(&start));
            path
        };

        if self.cache.is_some() {
            self.cache_path(&path);
        }
        path
    }

    /// Look up the cost of every step of `path` and store the path.
    fn cache_path(&mut self, path: &[G::State]) {
        let mut costs = mem::take(&mut self.edge_costs);
        let mut neighbors = mem::take(&mut self.node_costs);
        costs.clear();

        for step in path.windows(2) {
            let from = self.pool.fetch(step[0]);
            let to = self.pool.fetch(step[1]);
            self.node_neighbors(from, &mut neighbors);
            let cost = neighbors
                .iter()
                .filter(|nc| nc.node == to)
                .map(|nc| nc.cost)
                .reduce(f32::min);
            match cost {
                Some(cost) => costs.push(cost),
                None => break,
            }
        }

        if costs.len() + 1 == path.len() {
            if let Some(cache) = &mut self.cache {
                cache.add(path, &costs);
            }
        } else {
            log::warn!("path step has no matching edge; path not cached");
        }

        self.edge_costs = costs;
        self.node_costs = neighbors;
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Every state touched by the most recent search.
    pub fn states_in_pool(&self) -> Vec<G::State> {
        let mut states = Vec::new();
        if self.generation > 0 {
            self.pool.all_states(self.generation, &mut states);
        }
        states
    }

    /// Path cache statistics. All zero when caching is disabled.
    pub fn cache_data(&self) -> CacheData {
        let Some(cache) = &self.cache else {
            return CacheData::default();
        };
        let bytes_allocated = cache.allocated_bytes();
        let bytes_used = cache.used_bytes();
        let lookups = cache.hits + cache.misses;
        CacheData {
            bytes_allocated,
            bytes_used,
            memory_fraction: (bytes_used as f64 / bytes_allocated as f64) as f32,
            hits: cache.hits,
            misses: cache.misses,
            hit_fraction: if lookups > 0 {
                (f64::from(cache.hits) / f64::from(lookups)) as f32
            } else {
                0.0
            },
        }
    }

    /// Number of entries in the path cache (0 when disabled).
    pub fn cached_segments(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    /// Path cache slots (0 when disabled).
    pub fn cache_capacity(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.capacity())
    }

    pub fn pool_data(&self) -> PoolData {
        PoolData {
            nodes: self.pool.len(),
            blocks: self.pool.block_count(),
            hash_buckets: self.pool.hash_size(),
            cached_adjacent: self.pool.neighbor_cache_len(),
        }
    }
}
