//! Storage-ready dense transition table.
//!
//! The canonical automaton still stores its transitions as a triple list;
//! a table-driven consumer wants `next[state][symbol]` array lookups. One
//! extra trailing row acts as the error state every missing transition
//! lands in, so the walk itself never branches on `Option`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_binary::binary_stream::Endian;

use crate::automaton::{Automaton, StepError};

/// Row-major transition table over the observed alphabet. Row index is the
/// state id, column index is the symbol's position in `alphabet`; the last
/// row is the implicit error state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfaTable<A> {
    next: Vec<usize>,
    alphabet: Vec<A>,
    states: usize,
    initial: usize,
    accepting: Vec<bool>,
}

impl<A: Eq + Clone> DfaTable<A> {
    /// Builds the table from a canonically numbered automaton. Fails fast
    /// with [`StepError::NotDeterministic`] if two transitions share a
    /// `(state, symbol)` pair; a table lookup could only ever keep one of
    /// them, silently.
    pub fn from_automaton(automaton: &Automaton<usize, A>) -> Result<DfaTable<A>, StepError> {
        let mut alphabet: Vec<A> = Vec::new();
        let mut state_count = automaton.initial + 1;
        for (f, a, t) in &automaton.transitions {
            if !alphabet.contains(a) {
                alphabet.push(a.clone());
            }
            state_count = state_count.max(*f + 1).max(*t + 1);
        }
        for s in &automaton.accepting {
            state_count = state_count.max(*s + 1);
        }

        let error_state = state_count;
        let columns = alphabet.len();
        let mut next = vec![error_state; (state_count + 1) * columns];
        for (f, a, t) in &automaton.transitions {
            let column = alphabet
                .iter()
                .position(|x| x == a)
                .expect("symbol collected above");
            let slot = f * columns + column;
            if next[slot] != error_state {
                return Err(StepError::NotDeterministic);
            }
            next[slot] = *t;
        }

        let mut accepting = vec![false; state_count + 1];
        for s in &automaton.accepting {
            accepting[*s] = true;
        }

        Ok(DfaTable {
            next,
            alphabet,
            states: state_count + 1,
            initial: automaton.initial,
            accepting,
        })
    }

    /// Next state for `(state, symbol)`; symbols outside the observed
    /// alphabet go straight to the error state.
    pub fn next_state(&self, state: usize, symbol: &A) -> usize {
        match self.alphabet.iter().position(|x| x == symbol) {
            Some(column) => self.next[state * self.alphabet.len() + column],
            None => self.error_state(),
        }
    }

    pub fn initial_state(&self) -> usize {
        self.initial
    }

    pub fn error_state(&self) -> usize {
        self.states - 1
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting[state]
    }

    /// Table-driven acceptance walk.
    pub fn matches<I: IntoIterator<Item = A>>(&self, word: I) -> bool {
        let mut state = self.initial;
        for symbol in word {
            state = self.next_state(state, &symbol);
            if state == self.error_state() {
                return false;
            }
        }
        self.accepting[state]
    }
}

impl<A: Serialize> DfaTable<A> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_binary::Error> {
        serde_binary::to_vec(self, Endian::Little)
    }
}

impl<A: DeserializeOwned> DfaTable<A> {
    pub fn from_bytes(data: &[u8]) -> Result<DfaTable<A>, serde_binary::Error> {
        serde_binary::from_slice(data, Endian::Little)
    }
}
