/// Regular terms over an arbitrary symbol type `A`.
///
/// This is the input algebra of the whole pipeline: a caller (for example a
/// lexeme-specification layer) builds a `Term`, and `crate::compile` turns it
/// into a canonical transition table. Pure data, no behavior of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term<A> {
    /// Matches the empty string only.
    Empty,
    /// Matches exactly one symbol.
    Terminal(A),
    /// Left followed by right.
    Concat(Box<Term<A>>, Box<Term<A>>),
    /// Either side.
    Union(Box<Term<A>>, Box<Term<A>>),
    /// Zero or more repetitions.
    Star(Box<Term<A>>),
    /// One or more repetitions.
    Plus(Box<Term<A>>),
    /// Zero or one occurrence.
    Optional(Box<Term<A>>),
}

// boxing helpers so callers don't have to spell out Box::new everywhere
impl<A> Term<A> {
    pub fn terminal(symbol: A) -> Term<A> {
        Term::Terminal(symbol)
    }

    pub fn concat(a: Term<A>, b: Term<A>) -> Term<A> {
        Term::Concat(Box::new(a), Box::new(b))
    }

    pub fn union(a: Term<A>, b: Term<A>) -> Term<A> {
        Term::Union(Box::new(a), Box::new(b))
    }

    pub fn star(a: Term<A>) -> Term<A> {
        Term::Star(Box::new(a))
    }

    pub fn plus(a: Term<A>) -> Term<A> {
        Term::Plus(Box::new(a))
    }

    pub fn optional(a: Term<A>) -> Term<A> {
        Term::Optional(Box::new(a))
    }

    /// Concatenation of a whole symbol sequence; the empty sequence yields
    /// `Empty`.
    pub fn literal<I: IntoIterator<Item = A>>(symbols: I) -> Term<A> {
        let mut terms = symbols.into_iter().map(Term::Terminal);
        match terms.next() {
            Some(first) => terms.fold(first, Term::concat),
            None => Term::Empty,
        }
    }
}
