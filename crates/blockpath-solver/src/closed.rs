use crate::graph::State;
use crate::node::NodeId;
use crate::pool::NodePool;

/// Nodes fully expanded in the current search.
///
/// Membership is the `in_closed` flag on the pool node, so this type holds no
/// storage of its own; it only guards the state transitions.
#[derive(Debug, Default)]
pub(crate) struct ClosedSet;

impl ClosedSet {
    pub(crate) fn add<S: State>(&mut self, pool: &mut NodePool<S>, id: NodeId) {
        let node = pool.node_mut(id);
        log::trace!("closed add: {:?} total={:.1}", node.state, node.total_cost);
        assert!(!node.in_closed && !node.in_open, "close of an open or closed node");
        node.in_closed = true;
    }

    pub(crate) fn remove<S: State>(&mut self, pool: &mut NodePool<S>, id: NodeId) {
        let node = pool.node_mut(id);
        log::trace!("closed remove: {:?} total={:.1}", node.state, node.total_cost);
        assert!(node.in_closed && !node.in_open, "reopen of a node that is not closed");
        node.in_closed = false;
    }
}
