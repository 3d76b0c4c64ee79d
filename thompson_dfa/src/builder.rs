use crate::nfa::Nfa;
use crate::state::{State, StateId, Symbol};

/// A piece of an NFA under construction, identified by its entry and exit
/// states.
///
/// A fragment does not own its states, they live in the [`Builder`] that
/// produced it. Every fragment handed out by a builder has exactly one
/// accepting state, its own `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// Thompson construction combinators over an arena of states.
///
/// Each combinator consumes complete fragments and returns a new one, adding
/// states and epsilon edges to the arena as needed. When the fragment for the
/// whole pattern is ready, [`Builder::build`] turns the arena into an [`Nfa`].
#[derive(Debug, Default)]
pub struct Builder {
    states: Vec<State>,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Builder { states: Vec::new() }
    }

    /// The number of states allocated so far, reachable or not.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Finish construction with `fragment` as the whole automaton.
    pub fn build(self, fragment: Fragment) -> Nfa {
        Nfa::new(self.states, fragment.start, fragment.end)
    }

    fn add_state(&mut self, accepting: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(accepting));
        id
    }

    fn connect(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from].add_transition(symbol, to);
    }

    fn set_accepting(&mut self, id: StateId, accepting: bool) {
        self.states[id].set_accepting(accepting);
    }

    fn single(&mut self, symbol: Symbol) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);
        self.connect(start, symbol, end);
        Fragment { start, end }
    }

    /// `start --c--> end`
    pub fn char(&mut self, c: char) -> Fragment {
        self.single(Symbol::Char(c))
    }

    /// `start --ε--> end`, matching only the empty string.
    pub fn epsilon(&mut self) -> Fragment {
        self.single(Symbol::Epsilon)
    }

    /// Concatenation of two fragments.
    pub fn alt_pair(&mut self, first: Fragment, second: Fragment) -> Fragment {
        self.set_accepting(first.end, false);
        self.set_accepting(second.end, true);
        self.connect(first.end, Symbol::Epsilon, second.start);
        Fragment { start: first.start, end: second.end }
    }

    /// Concatenation of any number of fragments, folded from the left.
    pub fn alt<I>(&mut self, first: Fragment, rest: I) -> Fragment
    where
        I: IntoIterator<Item = Fragment>,
    {
        rest.into_iter().fold(first, |acc, next| self.alt_pair(acc, next))
    }

    /// Alternation of two fragments through a fresh entry and a fresh shared
    /// exit.
    pub fn or_pair(&mut self, first: Fragment, second: Fragment) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);

        self.connect(start, Symbol::Epsilon, first.start);
        self.connect(start, Symbol::Epsilon, second.start);

        self.set_accepting(first.end, false);
        self.set_accepting(second.end, false);

        self.connect(first.end, Symbol::Epsilon, end);
        self.connect(second.end, Symbol::Epsilon, end);

        Fragment { start, end }
    }

    /// Alternation of any number of fragments, folded from the left.
    pub fn or<I>(&mut self, first: Fragment, rest: I) -> Fragment
    where
        I: IntoIterator<Item = Fragment>,
    {
        rest.into_iter().fold(first, |acc, next| self.or_pair(acc, next))
    }

    /// Kleene star built in place: the fragment's own boundary states gain a
    /// skip edge and a loop edge.
    pub fn rep(&mut self, fragment: Fragment) -> Fragment {
        self.connect(fragment.start, Symbol::Epsilon, fragment.end);
        self.connect(fragment.end, Symbol::Epsilon, fragment.start);
        fragment
    }

    /// Kleene star through fresh boundary states.
    ///
    /// Unlike [`Builder::rep`], a match can never re-enter the operand through
    /// its exit state, so this accepts exactly the star of the operand.
    pub fn rep_explicit(&mut self, fragment: Fragment) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);

        self.connect(start, Symbol::Epsilon, fragment.start);
        self.connect(start, Symbol::Epsilon, end);

        self.set_accepting(fragment.end, false);
        self.connect(fragment.end, Symbol::Epsilon, end);
        self.connect(end, Symbol::Epsilon, fragment.start);

        Fragment { start, end }
    }

    /// One or more repetitions.
    pub fn plus_rep(&mut self, fragment: Fragment) -> Fragment {
        self.connect(fragment.end, Symbol::Epsilon, fragment.start);
        fragment
    }

    /// Zero or one occurrence.
    pub fn question_rep(&mut self, fragment: Fragment) -> Fragment {
        self.connect(fragment.start, Symbol::Epsilon, fragment.end);
        fragment
    }
}
