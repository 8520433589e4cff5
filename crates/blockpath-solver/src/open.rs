//! Frontier of the search: a doubly linked list sorted by total cost.
//!
//! Links live on the pool nodes themselves. A `None` link stands for the
//! sentinel, which behaves like a node of infinite cost sitting at both ends
//! of the list, so every finite-cost node always has an insertion point.
//!
//! Search frontiers on grids stay small, so linear insertion is cheap and
//! [`OpenQueue::update`] only has to shift a node a few places.

use crate::graph::{INFINITE_COST, State};
use crate::node::NodeId;
use crate::pool::NodePool;

#[derive(Debug, Default)]
pub(crate) struct OpenQueue {
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

/// Total cost of a link target, the sentinel counting as infinite.
#[inline]
fn link_cost<S: State>(pool: &NodePool<S>, link: Option<NodeId>) -> f32 {
    link.map_or(INFINITE_COST, |id| pool.node(id).total_cost)
}

impl OpenQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Insert a node that is neither open nor closed, after every node of
    /// equal or lower cost.
    pub(crate) fn push<S: State>(&mut self, pool: &mut NodePool<S>, id: NodeId) {
        let node = pool.node(id);
        assert!(!node.in_open && !node.in_closed, "push of a visited node");
        assert!(node.total_cost < INFINITE_COST, "push of an infinite-cost node");
        log::trace!("open push: {:?} total={:.1}", node.state, node.total_cost);

        let total = node.total_cost;
        let mut cursor = self.head;
        while let Some(c) = cursor {
            let other = pool.node(c);
            if total < other.total_cost {
                break;
            }
            cursor = other.next;
        }
        self.add_before(pool, cursor, id);
        pool.node_mut(id).in_open = true;

        debug_assert!(self.is_sorted(pool));
    }

    /// Remove and return the cheapest node.
    ///
    /// # Panics
    ///
    /// If the queue is empty.
    pub(crate) fn pop<S: State>(&mut self, pool: &mut NodePool<S>) -> NodeId {
        let Some(id) = self.head else {
            panic!("pop from an empty open queue");
        };
        self.unlink(pool, id);

        let node = pool.node_mut(id);
        assert!(node.in_open && !node.in_closed);
        node.in_open = false;
        log::trace!("open pop: {:?} total={:.1}", node.state, node.total_cost);
        id
    }

    /// Restore ordering after the cost of an open node changed.
    ///
    /// A node cheaper than its predecessor jumps to the front, then any node
    /// dearer than its successor walks right until it fits.
    pub(crate) fn update<S: State>(&mut self, pool: &mut NodePool<S>, id: NodeId) {
        let node = pool.node(id);
        assert!(node.in_open, "update of a node that is not open");
        log::trace!("open update: {:?} total={:.1}", node.state, node.total_cost);

        let total = node.total_cost;
        if let Some(prev) = node.prev {
            if total < pool.node(prev).total_cost {
                self.unlink(pool, id);
                self.add_before(pool, self.head, id);
            }
        }

        let next = pool.node(id).next;
        if total > link_cost(pool, next) {
            self.unlink(pool, id);
            let mut cursor = next;
            while total > link_cost(pool, cursor) {
                cursor = cursor.and_then(|c| pool.node(c).next);
            }
            self.add_before(pool, cursor, id);
        }

        debug_assert!(self.is_sorted(pool));
    }

    /// Link `id` in front of `before` (`None` = the sentinel, i.e. the tail).
    fn add_before<S: State>(&mut self, pool: &mut NodePool<S>, before: Option<NodeId>, id: NodeId) {
        let prev = match before {
            Some(b) => pool.node(b).prev,
            None => self.tail,
        };

        let node = pool.node_mut(id);
        node.prev = prev;
        node.next = before;

        match prev {
            Some(p) => pool.node_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        match before {
            Some(b) => pool.node_mut(b).prev = Some(id),
            None => self.tail = Some(id),
        }
    }

    fn unlink<S: State>(&mut self, pool: &mut NodePool<S>, id: NodeId) {
        let node = pool.node_mut(id);
        let (prev, next) = (node.prev, node.next);
        node.prev = None;
        node.next = None;

        match prev {
            Some(p) => pool.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => pool.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn is_sorted<S: State>(&self, pool: &NodePool<S>) -> bool {
        let mut prev_cost = f32::NEG_INFINITY;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(c) = cursor {
            let node = pool.node(c);
            if node.prev != prev || node.total_cost < prev_cost {
                return false;
            }
            prev_cost = node.total_cost;
            prev = cursor;
            cursor = node.next;
        }
        self.tail == prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(costs: &[f32]) -> (NodePool<u32>, Vec<NodeId>) {
        let mut pool = NodePool::new(8, 2);
        let ids = costs
            .iter()
            .enumerate()
            .map(|(i, &c)| pool.get_or_create(1, i as u32, c, 0.0, None))
            .collect();
        (pool, ids)
    }

    fn drain(open: &mut OpenQueue, pool: &mut NodePool<u32>) -> Vec<u32> {
        let mut out = Vec::new();
        while !open.is_empty() {
            let id = open.pop(pool);
            out.push(pool.node(id).state);
        }
        out
    }

    #[test]
    fn pops_cheapest_first() {
        let (mut pool, ids) = pool_with(&[5.0, 1.0, 3.0, 4.0, 2.0]);
        let mut open = OpenQueue::new();
        for &id in &ids {
            open.push(&mut pool, id);
        }
        assert_eq!(drain(&mut open, &mut pool), vec![1, 4, 2, 3, 0]);
        assert!(ids.iter().all(|&id| !pool.node(id).in_open));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let (mut pool, ids) = pool_with(&[2.0, 2.0, 1.0, 2.0]);
        let mut open = OpenQueue::new();
        for &id in &ids {
            open.push(&mut pool, id);
        }
        assert_eq!(drain(&mut open, &mut pool), vec![2, 0, 1, 3]);
    }

    #[test]
    fn update_moves_cheaper_node_to_front() {
        let (mut pool, ids) = pool_with(&[1.0, 2.0, 3.0, 4.0]);
        let mut open = OpenQueue::new();
        for &id in &ids {
            open.push(&mut pool, id);
        }

        let n = pool.node_mut(ids[3]);
        n.cost_from_start = 0.5;
        n.calc_total_cost();
        open.update(&mut pool, ids[3]);

        assert_eq!(drain(&mut open, &mut pool), vec![3, 0, 1, 2]);
    }

    #[test]
    fn update_walks_right_to_sorted_position() {
        let (mut pool, ids) = pool_with(&[1.0, 2.0, 3.0, 4.0]);
        let mut open = OpenQueue::new();
        for &id in &ids {
            open.push(&mut pool, id);
        }

        // Jumps to the front, then walks right past 1.0 and 2.0.
        let n = pool.node_mut(ids[3]);
        n.cost_from_start = 2.5;
        n.calc_total_cost();
        open.update(&mut pool, ids[3]);

        assert_eq!(drain(&mut open, &mut pool), vec![0, 1, 3, 2]);
    }

    #[test]
    fn update_of_dearer_node_walks_to_tail() {
        let (mut pool, ids) = pool_with(&[1.0, 2.0, 3.0]);
        let mut open = OpenQueue::new();
        for &id in &ids {
            open.push(&mut pool, id);
        }

        let n = pool.node_mut(ids[0]);
        n.cost_from_start = 9.0;
        n.calc_total_cost();
        open.update(&mut pool, ids[0]);

        assert_eq!(drain(&mut open, &mut pool), vec![1, 2, 0]);
    }

    #[test]
    #[should_panic(expected = "empty open queue")]
    fn pop_empty_panics() {
        let mut pool = NodePool::<u32>::new(4, 1);
        OpenQueue::new().pop(&mut pool);
    }

    #[test]
    #[should_panic(expected = "push of a visited node")]
    fn double_push_panics() {
        let (mut pool, ids) = pool_with(&[1.0]);
        let mut open = OpenQueue::new();
        open.push(&mut pool, ids[0]);
        open.push(&mut pool, ids[0]);
    }
}
