//! Term-to-NFA compilation.
//!
//! Counter-and-offset construction: every sub-term is compiled on its own
//! with states numbered from zero, then merged by offsetting one side's
//! state ids and splicing transitions together. There are no epsilon
//! transitions anywhere; where Thompson's construction would add one, this
//! construction clones the target state's outgoing transitions instead.

use crate::automaton::Automaton;
use crate::term::Term;

/// Compiles a term into an NFA over dense integer states. The initial state
/// of the result is whatever the outermost construction rule dictates; only
/// canonicalization promises state 0.
pub fn build<A: Eq + Clone>(term: &Term<A>) -> Automaton<usize, A> {
    compile(term).1
}

// every rule returns the state count alongside the automaton so the caller
// can offset a sibling build past it
fn compile<A: Eq + Clone>(term: &Term<A>) -> (usize, Automaton<usize, A>) {
    match term {
        Term::Empty => (
            1,
            Automaton {
                initial: 0,
                accepting: vec![0],
                transitions: Vec::new(),
            },
        ),
        Term::Terminal(symbol) => (
            2,
            Automaton {
                initial: 0,
                accepting: vec![1],
                transitions: vec![(0, symbol.clone(), 1)],
            },
        ),
        Term::Concat(a, b) => {
            let (na, a) = compile(a);
            let (nb, b) = compile(b);
            concat(na, a, nb, b)
        }
        Term::Union(a, b) => {
            let (na, a) = compile(a);
            let (nb, b) = compile(b);
            union(na, a, nb, b)
        }
        Term::Plus(a) => {
            let (n, a) = compile(a);
            plus(n, a)
        }
        Term::Optional(a) => {
            let (n, a) = compile(a);
            optional(n, a)
        }
        Term::Star(a) => {
            // zero-or-more is exactly Optional(Plus(a))
            let (n, a) = compile(a);
            let (n, a) = plus(n, a);
            optional(n, a)
        }
    }
}

fn offset<A>(automaton: Automaton<usize, A>, by: usize) -> Automaton<usize, A> {
    Automaton {
        initial: automaton.initial + by,
        accepting: automaton.accepting.into_iter().map(|s| s + by).collect(),
        transitions: automaton
            .transitions
            .into_iter()
            .map(|(f, a, t)| (f + by, a, t + by))
            .collect(),
    }
}

// transitions leaving a given state, cloned
fn leaving<A: Clone>(automaton: &Automaton<usize, A>, state: usize) -> Vec<(usize, A, usize)> {
    automaton
        .transitions
        .iter()
        .filter(|(f, _, _)| *f == state)
        .cloned()
        .collect()
}

fn concat<A: Clone>(
    na: usize,
    a: Automaton<usize, A>,
    nb: usize,
    b: Automaton<usize, A>,
) -> (usize, Automaton<usize, A>) {
    let b = offset(b, na);

    let mut transitions = a.transitions;
    // entering b is the same as leaving b's initial state, so each accepting
    // state of a inherits a copy of those transitions
    for (_, symbol, to) in leaving(&b, b.initial) {
        for fa in &a.accepting {
            transitions.push((*fa, symbol.clone(), to));
        }
    }
    transitions.extend(b.transitions);

    // if b accepts the empty string, stopping at the end of a is legal too
    let mut accepting = b.accepting.clone();
    if b.accepting.contains(&b.initial) {
        accepting.extend(a.accepting);
    }

    (
        na + nb,
        Automaton {
            initial: a.initial,
            accepting,
            transitions,
        },
    )
}

fn union<A: Clone>(
    na: usize,
    a: Automaton<usize, A>,
    nb: usize,
    b: Automaton<usize, A>,
) -> (usize, Automaton<usize, A>) {
    // state 0 is a fresh initial state distinct from both sides
    let a = offset(a, 1);
    let b = offset(b, 1 + na);

    let mut transitions = Vec::new();
    for side in [&a, &b] {
        for (_, symbol, to) in leaving(side, side.initial) {
            transitions.push((0, symbol, to));
        }
    }

    let mut accepting = Vec::new();
    if a.accepting.contains(&a.initial) || b.accepting.contains(&b.initial) {
        accepting.push(0);
    }
    accepting.extend(a.accepting.iter().copied());
    accepting.extend(b.accepting.iter().copied());

    transitions.extend(a.transitions);
    transitions.extend(b.transitions);

    (
        1 + na + nb,
        Automaton {
            initial: 0,
            accepting,
            transitions,
        },
    )
}

fn plus<A: Eq + Clone>(n: usize, a: Automaton<usize, A>) -> (usize, Automaton<usize, A>) {
    // every accepting state may loop back to the start: it inherits a copy
    // of each transition leaving the initial state
    let entry = leaving(&a, a.initial);
    let mut transitions = a.transitions;
    for fa in &a.accepting {
        for (_, symbol, to) in &entry {
            let clone = (*fa, symbol.clone(), *to);
            // the initial state may itself accept; skip triples already present
            if !transitions.contains(&clone) {
                transitions.push(clone);
            }
        }
    }

    (
        n,
        Automaton {
            initial: a.initial,
            accepting: a.accepting,
            transitions,
        },
    )
}

fn optional<A: Clone>(n: usize, a: Automaton<usize, A>) -> (usize, Automaton<usize, A>) {
    // fresh accepting initial state that mirrors the original entry
    // transitions; the original initial state keeps its role for loops
    let a = offset(a, 1);

    let mut transitions = Vec::new();
    for (_, symbol, to) in leaving(&a, a.initial) {
        transitions.push((0, symbol, to));
    }
    transitions.extend(a.transitions);

    let mut accepting = vec![0];
    accepting.extend(a.accepting.iter().copied());

    (
        1 + n,
        Automaton {
            initial: 0,
            accepting,
            transitions,
        },
    )
}
