use std::fmt;
use std::hash::Hash;

/// Edge cost meaning "not actually reachable". Edges with this cost are
/// ignored by every search.
pub const INFINITE_COST: f32 = f32::INFINITY;

/// Requirements on a graph vertex handle.
///
/// States are opaque to the solver: it only copies, compares, orders and
/// hashes them. Blanket-implemented for every qualifying type.
pub trait State: Copy + Eq + Ord + Hash + fmt::Debug {}

impl<T: Copy + Eq + Ord + Hash + fmt::Debug> State for T {}

/// A state paired with the cost of reaching it.
///
/// Returned by [`Graph::adjacent_cost`] (cost of the edge) and by
/// [`Pather::solve_for_near_states`](crate::Pather::solve_for_near_states)
/// (cost from the start state).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateCost<S> {
    pub state: S,
    pub cost: f32,
}

impl<S> StateCost<S> {
    #[inline]
    pub const fn new(state: S, cost: f32) -> Self {
        Self { state, cost }
    }
}

/// Callbacks the solver uses to explore a world it knows nothing about.
pub trait Graph {
    /// Vertex handle type.
    type State: State;

    /// Least possible cost between two states.
    /// Must never overestimate the true cost (admissible).
    fn least_cost_estimate(&self, from: Self::State, to: Self::State) -> f32;

    /// Append the exact cost from `state` to each neighbouring state into
    /// `adjacent`. The caller clears `adjacent` before calling.
    ///
    /// Results may be cached by the solver, so they must not change until
    /// [`Pather::reset`](crate::Pather::reset) is called. A state must never
    /// be listed as its own neighbour.
    fn adjacent_cost(&self, state: Self::State, adjacent: &mut Vec<StateCost<Self::State>>);

    /// Human-readable description of a state, used in log output only.
    fn describe_state(&self, state: Self::State) -> String {
        format!("{state:?}")
    }
}

impl<G: Graph + ?Sized> Graph for &G {
    type State = G::State;

    #[inline]
    fn least_cost_estimate(&self, from: Self::State, to: Self::State) -> f32 {
        (**self).least_cost_estimate(from, to)
    }

    #[inline]
    fn adjacent_cost(&self, state: Self::State, adjacent: &mut Vec<StateCost<Self::State>>) {
        (**self).adjacent_cost(state, adjacent)
    }

    fn describe_state(&self, state: Self::State) -> String {
        (**self).describe_state(state)
    }
}
