use std::collections::HashMap;
use std::hash::Hash;

use bit_set::BitSet;
use thiserror::Error;

/// A finite automaton: one initial state, a set of accepting states, and a
/// labeled transition multigraph stored as `(from, symbol, to)` triples.
///
/// There is no explicit state list. The state set is exactly the union of
/// `{initial}`, every transition endpoint, and every accepting state.
///
/// The same shape is threaded through every pipeline stage, so it is generic
/// over the state type: NFA states are dense integers, subset-construction
/// states are [`StateSet`]s of those integers, and canonicalization brings
/// the type back to dense integers. Each stage builds a fresh value; nothing
/// mutates its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<S, A> {
    pub initial: S,
    /// Duplicate-free by construction; kept as a `Vec` so traversal order is
    /// reproducible.
    pub accepting: Vec<S>,
    pub transitions: Vec<(S, A, S)>,
}

/// Contract violations surfaced by the DFA query surface. These are
/// programmer errors on the caller's side, not expected runtime conditions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    #[error("automaton is not deterministic: multiple transitions share a (state, symbol) pair")]
    NotDeterministic,
    #[error("run has no current state: a previous step already failed")]
    NoCurrentState,
}

impl<S, A> Automaton<S, A> {
    pub fn is_accepting(&self, state: &S) -> bool
    where
        S: PartialEq,
    {
        self.accepting.contains(state)
    }

    /// Looks up the single transition out of `from` on `symbol`.
    ///
    /// `Ok(None)` means no such transition exists, which is an ordinary
    /// answer (a rejecting run). More than one matching transition means the
    /// caller assumed a DFA it does not have, and fails fast.
    pub fn step(&self, from: &S, symbol: &A) -> Result<Option<&S>, StepError>
    where
        S: PartialEq,
        A: PartialEq,
    {
        let mut found = None;
        for (f, a, t) in &self.transitions {
            if f == from && a == symbol {
                if found.is_some() {
                    return Err(StepError::NotDeterministic);
                }
                found = Some(t);
            }
        }
        Ok(found)
    }

    /// True iff no two transitions share a `(from, symbol)` pair.
    pub fn is_deterministic(&self) -> bool
    where
        S: Eq + Hash + Clone,
        A: Eq + Hash + Clone,
    {
        let states = self.state_arena();
        let symbols = self.symbol_arena();
        let mut seen = vec![false; states.len() * symbols.len().max(1)];
        for (f, a, _) in &self.transitions {
            let f = states.id(f).expect("endpoint interned by state_arena");
            let a = symbols.id(a).expect("label interned by symbol_arena");
            let slot = f * symbols.len() + a;
            if seen[slot] {
                return false;
            }
            seen[slot] = true;
        }
        true
    }

    /// Acceptance by subset simulation. Total: works on NFAs and DFAs alike
    /// and never errors, at the price of tracking a whole state set.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        S: Eq + Hash + Clone,
        A: PartialEq,
        I: IntoIterator<Item = A>,
    {
        let states = self.state_arena();
        let id = |s: &S| states.id(s).expect("state interned by state_arena");

        let mut current = BitSet::with_capacity(states.len());
        current.insert(id(&self.initial));

        for symbol in word {
            let mut next = BitSet::with_capacity(states.len());
            for (f, a, t) in &self.transitions {
                if *a == symbol && current.contains(id(f)) {
                    next.insert(id(t));
                }
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }

        self.accepting.iter().any(|s| current.contains(id(s)))
    }

    /// Dense numbering of the state set in first-encounter order: initial
    /// state, then transition endpoints in list order, then accepting states.
    pub fn state_arena(&self) -> Arena<S>
    where
        S: Eq + Hash + Clone,
    {
        let mut arena = Arena::new();
        arena.intern(&self.initial);
        for (f, _, t) in &self.transitions {
            arena.intern(f);
            arena.intern(t);
        }
        for s in &self.accepting {
            arena.intern(s);
        }
        arena
    }

    /// The observed alphabet, numbered in first-observed order over the
    /// transition list.
    pub fn symbol_arena(&self) -> Arena<A>
    where
        A: Eq + Hash + Clone,
    {
        let mut arena = Arena::new();
        for (_, a, _) in &self.transitions {
            arena.intern(a);
        }
        arena
    }
}

/// A cursor walking a deterministic automaton one symbol at a time.
///
/// After a failed step there is no current state; further queries fail fast
/// instead of proceeding from an undefined state.
pub struct Run<'a, S, A> {
    automaton: &'a Automaton<S, A>,
    current: Option<&'a S>,
}

impl<'a, S: PartialEq, A: PartialEq> Run<'a, S, A> {
    pub fn new(automaton: &'a Automaton<S, A>) -> Run<'a, S, A> {
        Run {
            automaton,
            current: Some(&automaton.initial),
        }
    }

    /// Consumes one symbol. `Ok(false)` means the automaton has no matching
    /// transition and the run is now stuck.
    pub fn step(&mut self, symbol: &A) -> Result<bool, StepError> {
        let state = self.current.ok_or(StepError::NoCurrentState)?;
        match self.automaton.step(state, symbol)? {
            Some(next) => {
                self.current = Some(next);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    pub fn current(&self) -> Option<&'a S> {
        self.current
    }

    pub fn is_accepting(&self) -> bool {
        match self.current {
            Some(state) => self.automaton.is_accepting(state),
            None => false,
        }
    }
}

/// Interner assigning dense integer ids to values in first-encounter order.
///
/// Identity is structural (`Eq + Hash`), never pointer-based; this is what
/// the subset construction and the canonicalizer lean on to recognize a
/// state they have seen before.
#[derive(Debug, Clone, Default)]
pub struct Arena<T> {
    items: Vec<T>,
    ids: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> Arena<T> {
    pub fn new() -> Arena<T> {
        Arena {
            items: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Returns the id for `value`, allocating the next dense id on first
    /// encounter.
    pub fn intern(&mut self, value: &T) -> usize {
        match self.ids.get(value) {
            Some(id) => *id,
            None => {
                let id = self.items.len();
                self.items.push(value.clone());
                self.ids.insert(value.clone(), id);
                id
            }
        }
    }

    pub fn id(&self, value: &T) -> Option<usize> {
        self.ids.get(value).copied()
    }

    pub fn get(&self, id: usize) -> &T {
        &self.items[id]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// A set of dense state ids, used as the state type of determinized automata
/// (each state is a set of input-NFA ids) and of minimized automata (each
/// state is a partition block over the input DFA's ids).
///
/// Equality and hashing are structural, so two sets with the same members
/// are the same state no matter how they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet(BitSet);

impl StateSet {
    pub fn new() -> StateSet {
        StateSet(BitSet::new())
    }

    pub fn singleton(id: usize) -> StateSet {
        let mut set = BitSet::new();
        set.insert(id);
        StateSet(set)
    }

    pub fn insert(&mut self, id: usize) {
        self.0.insert(id);
    }

    pub fn contains(&self, id: usize) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter()
    }

    pub fn is_disjoint(&self, other: &StateSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn as_bit_set(&self) -> &BitSet {
        &self.0
    }
}

impl From<BitSet> for StateSet {
    fn from(set: BitSet) -> StateSet {
        StateSet(set)
    }
}

impl FromIterator<usize> for StateSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> StateSet {
        StateSet(iter.into_iter().collect())
    }
}
