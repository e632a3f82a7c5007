use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::range::{Domain, Range};
use super::range_map::RangeMap;
use super::sym::{ClassId, StateId, Sym};

/// Output of the boundary sweep: the equivalence-class partition of the
/// alphabet, and the per-state transition table indexed by class id.
pub(crate) struct Partition<T> {
    pub(crate) class_of: RangeMap<Sym, ClassId>,
    pub(crate) transitions: BTreeMap<StateId, BTreeMap<ClassId, T>>,
}

/// Computes the coarsest partition of the alphabet such that within each
/// class every state has identical transition behaviour.
///
/// Each `(state, range, target)` triple contributes an open event at
/// `range.lo` and a close event at `range.hi + 1`. Sweeping the sorted events
/// while maintaining the active `(state, target)` set yields slabs between
/// consecutive event positions; slabs with equal active sets land in the same
/// class. Opens and closes at the same position may apply in any order
/// because slabs lie strictly between positions.
pub(crate) fn partition<T>(raw: &BTreeMap<StateId, RangeMap<Sym, T>>) -> Partition<T>
where
    T: Clone + Ord,
{
    struct Event<T> {
        pos: Sym,
        open: bool,
        state: StateId,
        target: T,
    }

    let mut events: Vec<Event<T>> = Vec::new();
    for (&state, ranges) in raw {
        for (r, target) in ranges.iter() {
            events.push(Event {
                pos: r.lo(),
                open: true,
                state,
                target: target.clone(),
            });
            events.push(Event {
                pos: r.hi().succ(),
                open: false,
                state,
                target: target.clone(),
            });
        }
    }
    events.sort_by_key(|e| e.pos);

    let mut active: BTreeSet<(StateId, T)> = BTreeSet::new();
    let mut classes: BTreeMap<BTreeSet<(StateId, T)>, ClassId> = BTreeMap::new();
    let mut class_of = RangeMap::new();
    let mut transitions: BTreeMap<StateId, BTreeMap<ClassId, T>> = BTreeMap::new();

    let mut i = 0;
    while i < events.len() {
        let pos = events[i].pos;
        while i < events.len() && events[i].pos == pos {
            let e = &events[i];
            let key = (e.state, e.target.clone());
            if e.open {
                active.insert(key);
            } else {
                active.remove(&key);
            }
            i += 1;
        }
        if active.is_empty() {
            // empty slabs contribute no class
            continue;
        }
        // every active entry still has a pending close event, so a next
        // position exists and the slab is non-empty
        let next = events[i].pos;
        let slab = Range::span(pos, next.pred());
        let next_id = classes.len();
        let class = *classes.entry(active.clone()).or_insert(next_id);
        class_of.insert(slab, class);
        for (state, target) in &active {
            transitions
                .entry(*state)
                .or_default()
                .insert(class, target.clone());
        }
    }

    debug!(
        classes = classes.len(),
        states = transitions.len(),
        "alphabet partitioned"
    );

    Partition {
        class_of,
        transitions,
    }
}
