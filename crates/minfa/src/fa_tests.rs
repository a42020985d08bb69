use std::hash::Hash;

use crate::automaton::{Automaton, Run, StepError};
use crate::table::DfaTable;
use crate::term::Term;
use crate::{canonical, compile, dfa, minimize, nfa};

fn run_vectors(tests: &[(&str, bool)], fa: &Automaton<usize, u8>, label: &str) {
    for (input, expected) in tests {
        let result = fa.accepts(input.bytes());
        assert_eq!(
            result, *expected,
            "'{}' failed on input '{}', expect match: {}, actual match: {}",
            label, input, expected, result
        );
    }
}

// every word over `alphabet` up to length `max_len`, empty word included
fn words(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut all: Vec<Vec<u8>> = vec![Vec::new()];
    let mut frontier: Vec<Vec<u8>> = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next: Vec<Vec<u8>> = Vec::new();
        for word in &frontier {
            for c in alphabet {
                let mut longer = word.clone();
                longer.push(*c);
                next.push(longer);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn assert_equivalent<S1, S2>(
    a: &Automaton<S1, u8>,
    b: &Automaton<S2, u8>,
    alphabet: &[u8],
    max_len: usize,
) where
    S1: Eq + Hash + Clone,
    S2: Eq + Hash + Clone,
{
    for word in words(alphabet, max_len) {
        assert_eq!(
            a.accepts(word.iter().copied()),
            b.accepts(word.iter().copied()),
            "automata disagree on input {:?}",
            String::from_utf8_lossy(&word)
        );
    }
}

#[test]
fn plus_of_terminal() {
    let fa = compile(&Term::plus(Term::terminal(b'a')));

    let test_vectors = [
        ("a", true),
        ("aa", true),
        ("aaa", true),
        ("", false),
        ("b", false),
    ];

    run_vectors(&test_vectors, &fa, "a+");
    assert_eq!(fa.state_arena().len(), 2);
}

#[test]
fn concat_of_terminals() {
    let fa = compile(&Term::concat(Term::terminal(b'a'), Term::terminal(b'b')));

    let test_vectors = [
        ("ab", true),
        ("", false),
        ("a", false),
        ("b", false),
        ("ba", false),
        ("abb", false),
    ];

    run_vectors(&test_vectors, &fa, "ab");
    assert_eq!(fa.state_arena().len(), 3);
}

#[test]
fn union_of_terminals() {
    let term = Term::union(Term::terminal(b'a'), Term::terminal(b'b'));
    let dfa = dfa::determinize(&nfa::build(&term));
    assert!(dfa.is_deterministic());

    let fa = compile(&term);
    let test_vectors = [("a", true), ("b", true), ("ab", false), ("", false)];

    run_vectors(&test_vectors, &fa, "a|b");
    // both accepting branches collapse into one state
    assert_eq!(fa.state_arena().len(), 2);
}

#[test]
fn optional_terminal() {
    let fa = compile(&Term::optional(Term::terminal(b'a')));

    let test_vectors = [("", true), ("a", true), ("aa", false), ("b", false)];

    run_vectors(&test_vectors, &fa, "a?");
}

#[test]
fn star_terminal() {
    let fa = compile(&Term::star(Term::terminal(b'a')));

    let test_vectors = [
        ("", true),
        ("a", true),
        ("aaaa", true),
        ("b", false),
        ("ab", false),
    ];

    run_vectors(&test_vectors, &fa, "a*");
    // a* needs a single accepting state with a self loop
    assert_eq!(fa.state_arena().len(), 1);
}

#[test]
fn empty_term() {
    let fa = compile(&Term::<u8>::Empty);

    assert!(fa.accepts("".bytes()));
    assert!(!fa.accepts("a".bytes()));
    assert_eq!(fa.state_arena().len(), 1);
}

#[test]
fn concat_with_optional_tail() {
    // the tail accepts the empty string, so stopping after the head is legal
    let term = Term::concat(Term::terminal(b'a'), Term::optional(Term::terminal(b'b')));
    let fa = compile(&term);

    let test_vectors = [
        ("a", true),
        ("ab", true),
        ("", false),
        ("b", false),
        ("abb", false),
    ];

    run_vectors(&test_vectors, &fa, "ab?");
}

#[test]
fn star_over_alternation() {
    // a(b|c)*
    let term = Term::concat(
        Term::terminal(b'a'),
        Term::star(Term::union(Term::terminal(b'b'), Term::terminal(b'c'))),
    );
    let fa = compile(&term);

    let test_vectors = [
        ("a", true),
        ("b", false),
        ("x", false),
        ("ab", true),
        ("ac", true),
        ("abcbc", true),
        ("acbcb", true),
        ("bcbc", false),
        ("abbbbbbbbbb", true),
    ];

    run_vectors(&test_vectors, &fa, "a(b|c)*");
    assert_eq!(fa.state_arena().len(), 2);
}

#[test]
fn stages_preserve_the_language() {
    let terms = [
        Term::plus(Term::terminal(b'a')),
        Term::star(Term::union(
            Term::literal("ab".bytes()),
            Term::terminal(b'a'),
        )),
        Term::concat(
            Term::optional(Term::terminal(b'b')),
            Term::plus(Term::union(Term::terminal(b'a'), Term::terminal(b'b'))),
        ),
    ];

    for term in &terms {
        let nfa = nfa::build(term);
        let dfa = dfa::determinize(&nfa);
        let minimal = minimize::remove_deadlocks(&minimize::minimize(&dfa));
        let dense = canonical::renumber(&minimal);

        assert!(dfa.is_deterministic());
        assert!(dense.is_deterministic());
        assert_equivalent(&nfa, &dfa, b"ab", 5);
        assert_equivalent(&dfa, &minimal, b"ab", 5);
        assert_equivalent(&minimal, &dense, b"ab", 5);
    }
}

// classic 7-state fixture over {0,1}: initial 1, accepting {0,5}, states 3
// and 4 behave identically and are the only mergeable pair
fn seven_state_fixture() -> Automaton<usize, u8> {
    Automaton {
        initial: 1,
        accepting: vec![0, 5],
        transitions: vec![
            (1, b'0', 2),
            (1, b'1', 3),
            (2, b'0', 0),
            (2, b'1', 4),
            (3, b'0', 5),
            (3, b'1', 6),
            (4, b'0', 5),
            (4, b'1', 6),
            (0, b'0', 1),
            (0, b'1', 2),
            (5, b'0', 3),
            (5, b'1', 0),
            (6, b'0', 0),
            (6, b'1', 5),
        ],
    }
}

#[test]
fn minimization_regression() {
    let fixture = seven_state_fixture();
    assert_eq!(fixture.state_arena().len(), 7);
    assert_eq!(fixture.transitions.len(), 14);

    let minimal = minimize::minimize(&fixture);
    assert_eq!(minimal.state_arena().len(), 6);
    assert!(minimal.is_deterministic());
    assert_equivalent(&fixture, &minimal, b"01", 8);

    // the collapsed block is exactly {3, 4}; block members are dense
    // first-encounter indices over the fixture's states, so translate the
    // fixture's labels through the same arena before looking them up
    let labels = fixture.state_arena();
    let merged = minimal
        .state_arena()
        .iter()
        .find(|block| block.len() == 2)
        .cloned()
        .expect("one block of two states");
    assert!(
        merged.contains(labels.id(&3).expect("state 3 interned"))
            && merged.contains(labels.id(&4).expect("state 4 interned"))
    );

    // every state reaches acceptance, so pruning changes nothing
    let pruned = minimize::remove_deadlocks(&minimal);
    assert_eq!(pruned.transitions.len(), minimal.transitions.len());
}

#[test]
fn minimize_is_idempotent() {
    let term = Term::star(Term::union(
        Term::literal("ab".bytes()),
        Term::terminal(b'a'),
    ));
    let fa = compile(&term);

    let again =
        canonical::renumber(&minimize::remove_deadlocks(&minimize::minimize(&fa)));
    assert_eq!(again.state_arena().len(), fa.state_arena().len());
    assert_eq!(again.transitions.len(), fa.transitions.len());
    assert_eq!(again.accepting.len(), fa.accepting.len());
    assert_equivalent(&fa, &again, b"ab", 6);
}

#[test]
fn renumbering_is_stable() {
    let term = Term::concat(
        Term::terminal(b'a'),
        Term::star(Term::union(Term::terminal(b'b'), Term::terminal(b'c'))),
    );
    let dfa = dfa::determinize(&nfa::build(&term));

    let first = canonical::renumber(&dfa);
    let second = canonical::renumber(&dfa);
    assert_eq!(first, second);
    assert_eq!(first.initial, 0);

    // renumbering an already-dense automaton is the identity
    assert_eq!(canonical::renumber(&first), first);
}

#[test]
fn deadlock_pruning_drops_trap_states() {
    // state 2 loops forever without reaching acceptance
    let automaton = Automaton {
        initial: 0usize,
        accepting: vec![1],
        transitions: vec![(0, b'a', 1), (0, b'b', 2), (2, b'a', 2)],
    };

    let pruned = minimize::remove_deadlocks(&automaton);
    assert_eq!(pruned.transitions, vec![(0, b'a', 1)]);
    assert_eq!(pruned.initial, 0);
    assert_eq!(pruned.accepting, vec![1]);

    assert_eq!(minimize::remove_deadlocks(&pruned), pruned);
}

#[test]
fn step_rejects_nondeterministic_lookup() {
    let nfa = Automaton {
        initial: 0usize,
        accepting: vec![2],
        transitions: vec![(0, b'a', 1), (0, b'a', 2)],
    };

    assert!(!nfa.is_deterministic());
    assert_eq!(nfa.step(&0, &b'a'), Err(StepError::NotDeterministic));
    // a missing transition is an ordinary answer, not an error
    assert_eq!(nfa.step(&1, &b'a'), Ok(None));
}

#[test]
fn run_fails_fast_after_dead_end() {
    let fa = compile(&Term::literal("ab".bytes()));

    let mut run = Run::new(&fa);
    assert_eq!(run.step(&b'a'), Ok(true));
    assert!(!run.is_accepting());
    assert_eq!(run.step(&b'b'), Ok(true));
    assert!(run.is_accepting());

    let mut run = Run::new(&fa);
    assert_eq!(run.step(&b'x'), Ok(false));
    assert!(!run.is_accepting());
    assert_eq!(run.step(&b'a'), Err(StepError::NoCurrentState));
}

#[test]
fn table_matches_compiled_automaton() {
    let term = Term::concat(
        Term::terminal(b'a'),
        Term::star(Term::union(Term::terminal(b'b'), Term::terminal(b'c'))),
    );
    let fa = compile(&term);
    let table = DfaTable::from_automaton(&fa).expect("compiled automaton is deterministic");

    for word in words(b"abc", 4) {
        assert_eq!(
            table.matches(word.iter().copied()),
            fa.accepts(word.iter().copied()),
            "table disagrees on {:?}",
            String::from_utf8_lossy(&word)
        );
    }

    // symbols the automaton never saw land in the error row
    assert_eq!(table.next_state(table.initial_state(), &b'z'), table.error_state());

    let bytes = table.to_bytes().expect("serialization");
    let loaded = DfaTable::<u8>::from_bytes(&bytes).expect("deserialization");
    assert_eq!(loaded, table);
}

#[test]
#[should_panic(expected = "deterministic input")]
fn minimize_asserts_deterministic_input() {
    let nfa = Automaton {
        initial: 0usize,
        accepting: vec![1],
        transitions: vec![(0, b'a', 1), (0, b'a', 0)],
    };

    let _ = minimize::minimize(&nfa);
}

#[test]
fn table_rejects_nondeterministic_automaton() {
    let nfa = Automaton {
        initial: 0usize,
        accepting: vec![1],
        transitions: vec![(0, b'a', 1), (0, b'a', 0)],
    };

    assert_eq!(
        DfaTable::from_automaton(&nfa),
        Err(StepError::NotDeterministic)
    );
}
