//! Subset construction.
//!
//! Converts any NFA into a language-equivalent DFA whose states are sets of
//! the input automaton's states. Input states may be of any type; they are
//! interned into dense ids first so every state set is a [`BitSet`] compared
//! and hashed structurally. Object identity plays no part in recognizing an
//! already-visited subset.
//!
//! Members of an output [`StateSet`] are those dense first-encounter indices
//! (the numbering of [`Automaton::state_arena`]), not the input's own state
//! values; callers inspecting subsets must translate through the same arena.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use bit_set::BitSet;

use crate::automaton::{Automaton, StateSet};

pub fn determinize<S, A>(nfa: &Automaton<S, A>) -> Automaton<StateSet, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    let states = nfa.state_arena();
    let symbols = nfa.symbol_arena();
    let id = |s: &S| states.id(s).expect("endpoint interned by state_arena");

    // per-state outgoing moves keyed by symbol id
    let mut moves: Vec<Vec<(usize, usize)>> = vec![Vec::new(); states.len()];
    for (f, a, t) in &nfa.transitions {
        let a = symbols.id(a).expect("label interned by symbol_arena");
        moves[id(f)].push((a, id(t)));
    }

    let accepting: BitSet = nfa.accepting.iter().map(|s| id(s)).collect();

    let mut start = BitSet::with_capacity(states.len());
    start.insert(id(&nfa.initial));

    // registry of every subset produced so far; the map key is the subset
    // value itself, so set-equal subsets collapse onto one id
    let mut subsets: Vec<BitSet> = vec![start.clone()];
    let mut subset_ids: HashMap<BitSet, usize> = HashMap::new();
    subset_ids.insert(start.clone(), 0);

    let mut work_queue: VecDeque<usize> = VecDeque::new();
    work_queue.push_back(0);

    let mut transitions: Vec<(usize, usize, usize)> = Vec::new();

    while let Some(q) = work_queue.pop_front() {
        for symbol in 0..symbols.len() {
            let mut target = BitSet::with_capacity(states.len());
            for from in subsets[q].iter() {
                for (a, to) in &moves[from] {
                    if *a == symbol {
                        target.insert(*to);
                    }
                }
            }
            if target.is_empty() {
                continue;
            }

            let fresh = subsets.len();
            let target_id = *subset_ids.entry(target.clone()).or_insert(fresh);
            if target_id == fresh {
                subsets.push(target);
                work_queue.push_back(target_id);
            }
            transitions.push((q, symbol, target_id));
        }
    }

    let as_state = |subset_id: usize| StateSet::from(subsets[subset_id].clone());

    Automaton {
        initial: as_state(0),
        accepting: (0..subsets.len())
            .filter(|i| !subsets[*i].is_disjoint(&accepting))
            .map(|i| as_state(i))
            .collect(),
        transitions: transitions
            .into_iter()
            .map(|(f, a, t)| (as_state(f), symbols.get(a).clone(), as_state(t)))
            .collect(),
    }
}
