//! Canonical renumbering.
//!
//! Late pipeline stages produce automata whose states are sets or other
//! structured values. Downstream consumers want plain array indices, so this
//! stage rewrites any automaton over dense `0..n` integer states.

use std::hash::Hash;

use crate::automaton::Automaton;

/// Assigns every distinct state a dense integer id in first-encounter order
/// (initial state, transition endpoints in list order, accepting states) and
/// rewrites the automaton in terms of those ids. The initial state always
/// becomes 0. Running it twice on the same input yields the same table.
pub fn renumber<S, A>(automaton: &Automaton<S, A>) -> Automaton<usize, A>
where
    S: Eq + Hash + Clone,
    A: Clone,
{
    let states = automaton.state_arena();
    let id = |s: &S| states.id(s).expect("endpoint interned by state_arena");

    Automaton {
        initial: id(&automaton.initial),
        accepting: automaton.accepting.iter().map(|s| id(s)).collect(),
        transitions: automaton
            .transitions
            .iter()
            .map(|(f, a, t)| (id(f), a.clone(), id(t)))
            .collect(),
    }
}
