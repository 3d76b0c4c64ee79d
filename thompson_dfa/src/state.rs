use indexmap::{IndexMap, IndexSet};

/// Index of a state in an automaton's state arena.
pub type StateId = usize;

/// A 1-based state number as it appears in transition tables.
pub type StateNumber = usize;

/// The label on an NFA edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Moves without consuming input.
    Epsilon,
    /// Consumes exactly this character.
    Char(char),
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Char(c) => write!(f, "{}", c),
        }
    }
}

/// A node of a Thompson NFA.
///
/// Edges are plain [`StateId`]s into the arena that owns the state, so cycles
/// created by repetition need no shared ownership. Destinations for a symbol
/// are kept in insertion order because state numbering follows edge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    transitions: IndexMap<Symbol, IndexSet<StateId>>,
    accepting: bool,
}

impl State {
    /// Create a state with no edges.
    pub fn new(accepting: bool) -> Self {
        State { transitions: IndexMap::new(), accepting }
    }

    /// Whether the state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub(crate) fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// Record an edge to `to` on `symbol`. Adding the same edge twice is a
    /// no-op.
    pub fn add_transition(&mut self, symbol: Symbol, to: StateId) -> &mut Self {
        self.transitions.entry(symbol).or_default().insert(to);
        self
    }

    /// Destinations on `symbol`, in the order the edges were added. Empty when
    /// there are none.
    pub fn transitions_on(&self, symbol: Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.get(&symbol).into_iter().flat_map(|set| set.iter().copied())
    }

    /// All edges grouped by symbol, in the order each symbol was first used.
    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, &IndexSet<StateId>)> + '_ {
        self.transitions.iter().map(|(symbol, set)| (*symbol, set))
    }
}
