//! Finite-automaton construction and minimization.
//!
//! A regular term compiles to an epsilon-free NFA, the subset construction
//! determinizes it, partition refinement shrinks it to the unique minimal
//! DFA, dead transitions are pruned, and canonical renumbering yields a
//! densely numbered transition table for any downstream matcher or lexer.

use std::hash::Hash;

pub mod automaton;
pub mod canonical;
pub mod dfa;
pub mod minimize;
pub mod nfa;
pub mod table;
pub mod term;

#[cfg(test)]
mod fa_tests;

pub use automaton::{Arena, Automaton, Run, StateSet, StepError};
pub use table::DfaTable;
pub use term::Term;

/// The whole pipeline: term to canonical minimal DFA over dense `0..n`
/// states, with dead states pruned.
pub fn compile<A: Eq + Hash + Clone>(term: &Term<A>) -> Automaton<usize, A> {
    let nfa = nfa::build(term);
    let dfa = dfa::determinize(&nfa);
    let minimal = minimize::minimize(&dfa);
    let pruned = minimize::remove_deadlocks(&minimal);
    canonical::renumber(&pruned)
}
