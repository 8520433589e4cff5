//! Memo of solved path segments.
//!
//! Every step of a solved path is stored against the path's *destination*:
//! for `a -> b -> c -> d` the table gains `(a, d) -> b`, `(b, d) -> c` and
//! `(c, d) -> d`. A later query from any of those states to `d` replays the
//! chain of next hops without searching. Failed searches are stored as
//! entries with no next hop.
//!
//! The table never grows and never evicts: once a batch would push occupancy
//! past three quarters of the slots, the batch is dropped.

use std::hash::Hasher;
use std::mem;

use rustc_hash::FxHasher;

use crate::graph::{INFINITE_COST, State};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Item<S> {
    start: S,
    end: S,
    /// `None` records that `end` cannot be reached from `start`.
    next: Option<S>,
    /// Cost from `start` to `next`.
    cost: f32,
}

/// Result of probing the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CacheProbe {
    Solved(f32),
    NoSolution,
    NotCached,
}

pub(crate) struct PathCache<S> {
    items: Vec<Option<Item<S>>>,
    num_items: usize,
    pub(crate) hits: u32,
    pub(crate) misses: u32,
}

impl<S: State> PathCache<S> {
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "path cache needs at least one slot");
        Self {
            items: vec![None; capacity],
            num_items: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Drop every entry and zero the hit/miss counters.
    pub(crate) fn reset(&mut self) {
        if self.num_items > 0 {
            self.items.fill(None);
            self.num_items = 0;
        }
        self.hits = 0;
        self.misses = 0;
    }

    fn has_room_for(&self, count: usize) -> bool {
        self.num_items + count <= self.items.len() * 3 / 4
    }

    /// Record every step of a solved path. `costs[i]` is the cost of the edge
    /// `path[i] -> path[i + 1]`.
    pub(crate) fn add(&mut self, path: &[S], costs: &[f32]) {
        debug_assert_eq!(path.len(), costs.len() + 1);
        let Some(&end) = path.last() else {
            return;
        };
        if !self.has_room_for(path.len()) {
            log::debug!("path cache full, dropped {} segments", path.len() - 1);
            return;
        }

        for (step, &cost) in path.windows(2).zip(costs) {
            self.add_item(Item {
                start: step[0],
                end,
                next: Some(step[1]),
                cost,
            });
        }
    }

    /// Record that `end` cannot be reached from any of `starts`.
    pub(crate) fn add_no_solution(&mut self, end: S, starts: &[S]) {
        if !self.has_room_for(starts.len()) {
            log::debug!("path cache full, dropped {} failures", starts.len());
            return;
        }
        for &start in starts {
            self.add_item(Item {
                start,
                end,
                next: None,
                cost: INFINITE_COST,
            });
        }
    }

    /// Replay a cached path from `start` to `end` into `path`.
    ///
    /// `path` is untouched on a miss or a failure hit, and left empty if a
    /// chain turns out to be broken.
    pub(crate) fn solve(&mut self, start: S, end: S, path: &mut Vec<S>) -> CacheProbe {
        let Some(first) = self.find(start, end) else {
            self.misses += 1;
            return CacheProbe::NotCached;
        };
        let Some(mut next) = first.next else {
            self.hits += 1;
            return CacheProbe::NoSolution;
        };

        path.clear();
        path.push(start);
        let mut total = first.cost;
        loop {
            path.push(next);
            if next == end {
                break;
            }
            // Each hop adds a distinct state, so a sound chain is never longer
            // than the table.
            let item = match self.find(next, end) {
                Some(item) if path.len() <= self.num_items + 1 => item,
                _ => {
                    log::warn!("path cache chain to {end:?} broken at {next:?}");
                    path.clear();
                    self.misses += 1;
                    return CacheProbe::NotCached;
                }
            };
            let Some(hop) = item.next else {
                log::warn!("path cache chain to {end:?} ends in a failure at {next:?}");
                path.clear();
                self.misses += 1;
                return CacheProbe::NotCached;
            };
            total += item.cost;
            next = hop;
        }

        self.hits += 1;
        CacheProbe::Solved(total)
    }

    #[inline]
    fn slot(&self, start: S, end: S) -> usize {
        let mut hasher = FxHasher::default();
        start.hash(&mut hasher);
        end.hash(&mut hasher);
        (hasher.finish() % self.items.len() as u64) as usize
    }

    fn add_item(&mut self, item: Item<S>) {
        let mut index = self.slot(item.start, item.end);
        loop {
            match self.items[index] {
                None => {
                    self.items[index] = Some(item);
                    self.num_items += 1;
                    return;
                }
                Some(existing) if existing.start == item.start && existing.end == item.end => {
                    debug_assert_eq!(
                        existing.next.is_some(),
                        item.next.is_some(),
                        "conflicting path cache entries"
                    );
                    return;
                }
                Some(_) => index = (index + 1) % self.items.len(),
            }
        }
    }

    fn find(&self, start: S, end: S) -> Option<Item<S>> {
        let mut index = self.slot(start, end);
        loop {
            match self.items[index] {
                None => return None,
                Some(item) if item.start == start && item.end == end => return Some(item),
                Some(_) => index = (index + 1) % self.items.len(),
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.num_items
    }

    pub(crate) fn capacity(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn allocated_bytes(&self) -> usize {
        self.items.len() * mem::size_of::<Option<Item<S>>>()
    }

    pub(crate) fn used_bytes(&self) -> usize {
        self.num_items * mem::size_of::<Option<Item<S>>>()
    }
}
