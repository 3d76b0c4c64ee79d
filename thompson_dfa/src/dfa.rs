use std::collections::{BTreeMap, BTreeSet, VecDeque};

use indexmap::{IndexMap, IndexSet};

use crate::nfa::{Nfa, NfaTable};
use crate::state::StateNumber;

/// The number of a DFA's start state.
pub const START: StateNumber = 1;

/// Transitions of a DFA: at most one destination per state and character.
pub type DfaTransitionTable = BTreeMap<StateNumber, BTreeMap<char, StateNumber>>;

/// Transitions of a DFA before its states are renumbered, keyed by the NFA
/// states each DFA state stands for.
pub type CombinedTransitionTable = IndexMap<CombinedState, IndexMap<char, CombinedState>>;

/// A DFA state as a list of NFA state numbers.
///
/// The numbers keep the order in which subset construction gathered them,
/// they are not sorted. Two lists holding the same numbers in a different
/// order are different combined states.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombinedState(Vec<StateNumber>);

impl CombinedState {
    pub fn new(states: Vec<StateNumber>) -> Self {
        CombinedState(states)
    }

    /// The NFA state numbers, in the order they were gathered.
    pub fn states(&self) -> &[StateNumber] {
        &self.0
    }

    /// The label of this state, its numbers joined with commas.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for CombinedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, number) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", number)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Combined {
    table: CombinedTransitionTable,
    accepting: IndexSet<CombinedState>,
}

/// A DFA built from an [`Nfa`] by subset construction
///
/// Each DFA state stands for a combined set of NFA states. After
/// construction the states are renumbered densely from 1 in the order they
/// were first expanded, so the start state is always number 1. Matching is a
/// single table lookup per character.
#[derive(Debug, Clone)]
pub struct Dfa {
    alphabet: IndexSet<char>,
    table: DfaTransitionTable,
    accepting: BTreeSet<StateNumber>,
    combined: Option<Combined>,
}

impl Dfa {
    /// Determinize `nfa`.
    pub fn new(nfa: &Nfa) -> Self {
        Self::from_nfa_table(nfa.transition_table())
    }

    /// Determinize an NFA given as its numbered transition table.
    pub fn from_nfa_table(nfa: &NfaTable) -> Self {
        let alphabet = nfa.alphabet().clone();
        let combined = subset_construction(nfa, &alphabet);
        let (table, accepting) = renumber(&combined);

        debug!(
            "built DFA with {} states ({} accepting) over {} symbols",
            table.len(),
            accepting.len(),
            alphabet.len()
        );

        Dfa { alphabet, table, accepting, combined: Some(combined) }
    }

    /// Build a DFA from a previously computed transition table and accepting
    /// set, e.g. one loaded from a cache. Such a DFA has no combined table.
    pub fn from_parts(table: DfaTransitionTable, accepting: BTreeSet<StateNumber>) -> Self {
        let alphabet = table.values().flat_map(|row| row.keys().copied()).collect::<BTreeSet<_>>();
        Dfa { alphabet: alphabet.into_iter().collect(), table, accepting, combined: None }
    }

    /// Whether the whole of `haystack` is accepted.
    pub fn matches(&self, haystack: &str) -> bool {
        let mut current = START;
        for c in haystack.chars() {
            match self.table.get(&current).and_then(|row| row.get(&c)) {
                Some(&next) => current = next,
                None => return false,
            }
        }
        self.accepting.contains(&current)
    }

    /// The number of states in the transition table.
    /// The number of states in the transition table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the transition table has no states.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The characters of the NFA this was built from.
    pub fn alphabet(&self) -> &IndexSet<char> {
        &self.alphabet
    }

    /// The renumbered transition table, starting at state 1.
    pub fn transition_table(&self) -> &DfaTransitionTable {
        &self.table
    }

    /// The renumbered accepting states.
    pub fn accepting_state_numbers(&self) -> &BTreeSet<StateNumber> {
        &self.accepting
    }

    /// The table as subset construction produced it, before renumbering.
    /// `None` once the table has been replaced or for DFAs built with
    /// [`Dfa::from_parts`].
    pub fn original_transition_table(&self) -> Option<&CombinedTransitionTable> {
        self.combined.as_ref().map(|combined| &combined.table)
    }

    /// Accepting combined states before renumbering.
    pub fn original_accepting_state_numbers(&self) -> Option<&IndexSet<CombinedState>> {
        self.combined.as_ref().map(|combined| &combined.accepting)
    }

    /// Replace the transition table. The alphabet is left as it was.
    pub fn set_transition_table(&mut self, table: DfaTransitionTable) {
        self.table = table;
        self.combined = None;
    }

    /// Replace the accepting states.
    pub fn set_accepting_state_numbers(&mut self, accepting: BTreeSet<StateNumber>) {
        self.accepting = accepting;
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (number, row) in &self.table {
            let marker = if self.accepting.contains(number) { "*" } else { " " };
            write!(f, "{}{}:", marker, number)?;
            for (c, to) in row {
                write!(f, " {} -> {}", c, to)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Worklist subset construction. Combined states are expanded in the order
// they are popped from the front of the worklist, and newly discovered ones
// are pushed to the front. Expansion order decides the final numbering.
fn subset_construction(nfa: &NfaTable, alphabet: &IndexSet<char>) -> Combined {
    let start = nfa.row(1).map(|row| row.epsilon_closure().to_vec()).unwrap_or_default();
    let nfa_accepting = nfa.accepting_state_numbers();

    let mut worklist = VecDeque::new();
    worklist.push_back(CombinedState(start));

    let mut table = CombinedTransitionTable::new();
    let mut accepting = IndexSet::new();

    while let Some(current) = worklist.pop_front() {
        if table.contains_key(&current) {
            continue;
        }
        trace!("expanding combined state {{{}}}", current);

        if current.states().iter().any(|number| nfa_accepting.contains(number)) {
            accepting.insert(current.clone());
        }

        let mut row = IndexMap::new();
        for &c in alphabet {
            let mut on_symbol = IndexSet::new();
            for &number in current.states() {
                let Some(from) = nfa.row(number) else {
                    continue;
                };
                for &to in from.transitions_on(c) {
                    if let Some(to) = nfa.row(to) {
                        on_symbol.extend(to.epsilon_closure().iter().copied());
                    }
                }
            }

            if on_symbol.is_empty() {
                continue;
            }

            let next = CombinedState(on_symbol.into_iter().collect());
            if next != current && !table.contains_key(&next) {
                worklist.push_front(next.clone());
            }
            row.insert(c, next);
        }

        table.insert(current, row);
    }

    Combined { table, accepting }
}

fn renumber(combined: &Combined) -> (DfaTransitionTable, BTreeSet<StateNumber>) {
    let number_of = |state: &CombinedState| combined.table.get_index_of(state).map(|index| index + 1);

    let table: DfaTransitionTable = combined
        .table
        .values()
        .enumerate()
        .map(|(index, row)| {
            let row: BTreeMap<char, StateNumber> =
                row.iter().filter_map(|(c, to)| number_of(to).map(|to| (*c, to))).collect();
            (index + 1, row)
        })
        .collect();

    let accepting: BTreeSet<StateNumber> = combined.accepting.iter().filter_map(number_of).collect();

    (table, accepting)
}
