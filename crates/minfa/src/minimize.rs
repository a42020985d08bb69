//! DFA minimization and dead-state pruning.
//!
//! [`minimize`] merges states that no future input can tell apart, using
//! iterative partition refinement: states are regrouped by their per-symbol
//! target blocks until a full pass changes nothing. Worst case is
//! `O(n^2 * |alphabet|)`; the automata here are lexer-sized, so the simpler
//! refinement is preferred over Hopcroft's worklist variant.
//!
//! [`remove_deadlocks`] is the separate backward pass that drops transitions
//! leading into states from which acceptance is unreachable. Run it after
//! minimization so no trap states survive into the final table.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use bit_set::BitSet;

use crate::automaton::{Automaton, StateSet};

/// Merges indistinguishable states of a deterministic automaton. Each output
/// state is a partition block over the input automaton's states, with block
/// members given as the dense first-encounter indices handed out by
/// [`Automaton::state_arena`] — not as the input's own state values. Callers
/// inspecting blocks must translate through that same arena. Unreachable
/// input states are dropped before refinement begins.
///
/// Input must be deterministic; with multiple transitions per
/// `(state, symbol)` the per-symbol target is not well defined.
pub fn minimize<S, A>(dfa: &Automaton<S, A>) -> Automaton<StateSet, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    debug_assert!(
        dfa.is_deterministic(),
        "minimize requires a deterministic input automaton"
    );

    let states = dfa.state_arena();
    let symbols = dfa.symbol_arena();
    let id = |s: &S| states.id(s).expect("endpoint interned by state_arena");

    // dense transition function, one row per state
    let mut delta: Vec<Vec<Option<usize>>> = vec![vec![None; symbols.len()]; states.len()];
    for (f, a, t) in &dfa.transitions {
        let a = symbols.id(a).expect("label interned by symbol_arena");
        delta[id(f)][a] = Some(id(t));
    }

    // forward reachability from the initial state
    let mut reachable = BitSet::with_capacity(states.len());
    let mut queue: VecDeque<usize> = VecDeque::new();
    reachable.insert(id(&dfa.initial));
    queue.push_back(id(&dfa.initial));
    while let Some(q) = queue.pop_front() {
        for target in delta[q].iter().flatten() {
            if !reachable.contains(*target) {
                reachable.insert(*target);
                queue.push_back(*target);
            }
        }
    }

    let accepting: BitSet = dfa
        .accepting
        .iter()
        .map(|s| id(s))
        .filter(|s| reachable.contains(*s))
        .collect();

    // seed partition: reachable accepting vs. reachable non-accepting
    let mut nonaccepting = reachable.clone();
    nonaccepting.difference_with(&accepting);
    let mut blocks: Vec<BitSet> = [accepting, nonaccepting]
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    // split blocks by per-symbol target block until a pass is a no-op;
    // grouping preserves first-encounter order so block numbering is
    // reproducible for a given transition order
    loop {
        let mut block_of = vec![usize::MAX; states.len()];
        for (i, block) in blocks.iter().enumerate() {
            for s in block.iter() {
                block_of[s] = i;
            }
        }

        let mut next: Vec<BitSet> = Vec::new();
        for block in &blocks {
            let mut groups: HashMap<Vec<Option<usize>>, usize> = HashMap::new();
            for s in block.iter() {
                let signature: Vec<Option<usize>> = delta[s]
                    .iter()
                    .map(|target| target.map(|t| block_of[t]))
                    .collect();
                let fresh = next.len();
                let group = *groups.entry(signature).or_insert(fresh);
                if group == fresh {
                    next.push(BitSet::with_capacity(states.len()));
                }
                next[group].insert(s);
            }
        }

        if next.len() == blocks.len() {
            break;
        }
        blocks = next;
    }

    let mut block_of = vec![usize::MAX; states.len()];
    for (i, block) in blocks.iter().enumerate() {
        for s in block.iter() {
            block_of[s] = i;
        }
    }
    let as_state = |block: usize| StateSet::from(blocks[block].clone());

    // one representative per block; the seed partition guarantees every
    // member agrees on acceptance, and refinement on transitions
    let mut transitions = Vec::new();
    let mut accepting_blocks = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        let representative = block.iter().next().expect("blocks are never empty");
        if dfa.is_accepting(states.get(representative)) {
            accepting_blocks.push(as_state(i));
        }
        for (a, target) in delta[representative].iter().enumerate() {
            if let Some(t) = target {
                transitions.push((as_state(i), symbols.get(a).clone(), as_state(block_of[*t])));
            }
        }
    }

    Automaton {
        initial: as_state(block_of[id(&dfa.initial)]),
        accepting: accepting_blocks,
        transitions,
    }
}

/// Drops every transition whose source or target cannot reach an accepting
/// state (backward reachability from the accepting set). Accepting states
/// trivially reach themselves and always survive; so does the initial state,
/// even when the recognized language is empty. Idempotent.
pub fn remove_deadlocks<S, A>(automaton: &Automaton<S, A>) -> Automaton<S, A>
where
    S: Eq + Hash + Clone,
    A: Clone,
{
    let states = automaton.state_arena();
    let id = |s: &S| states.id(s).expect("endpoint interned by state_arena");

    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); states.len()];
    for (f, _, t) in &automaton.transitions {
        incoming[id(t)].push(id(f));
    }

    let mut live = BitSet::with_capacity(states.len());
    let mut queue: VecDeque<usize> = VecDeque::new();
    for s in &automaton.accepting {
        let s = id(s);
        if !live.contains(s) {
            live.insert(s);
            queue.push_back(s);
        }
    }
    while let Some(q) = queue.pop_front() {
        for source in &incoming[q] {
            if !live.contains(*source) {
                live.insert(*source);
                queue.push_back(*source);
            }
        }
    }

    Automaton {
        initial: automaton.initial.clone(),
        accepting: automaton.accepting.clone(),
        transitions: automaton
            .transitions
            .iter()
            .filter(|(f, _, t)| live.contains(id(f)) && live.contains(id(t)))
            .cloned()
            .collect(),
    }
}
