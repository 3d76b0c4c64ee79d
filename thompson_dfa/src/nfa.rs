use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::state::{State, StateId, StateNumber, Symbol};

/// The name of the synthetic table entry holding a state's epsilon closure.
pub const EPSILON_CLOSURE: &str = "ε*";

/// A Thompson NFA
///
/// Built by [`Builder::build`](crate::Builder::build), after which it never
/// changes. Everything derived from the state graph (epsilon closures, the
/// numbered transition table, the alphabet and the accepting states) is
/// computed once, when the NFA is created.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    end: StateId,
    /// Epsilon closure of every state in the arena, indexed by state id.
    closures: Vec<IndexSet<StateId>>,
    /// Reachable states in depth-first discovery order. The state at index
    /// `i` is numbered `i + 1`.
    order: Vec<StateId>,
    numbers: Vec<Option<StateNumber>>,
    table: NfaTable,
}

impl Nfa {
    pub(crate) fn new(states: Vec<State>, start: StateId, end: StateId) -> Self {
        let closures = (0..states.len()).map(|id| epsilon_closure(&states, id)).collect::<Vec<_>>();
        let order = discovery_order(&states, start);

        let mut numbers = vec![None; states.len()];
        for (index, &id) in order.iter().enumerate() {
            numbers[id] = Some(index + 1);
        }

        let table = NfaTable::new(&states, &closures, &order, &numbers);
        debug!("built NFA with {} states, {} reachable", states.len(), order.len());

        Nfa { states, start, end, closures, order, numbers, table }
    }

    /// The entry state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The exit state of the outermost fragment.
    pub fn end(&self) -> StateId {
        self.end
    }

    /// The state with arena index `id`.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// The number of states in the arena, including unreachable ones.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the arena has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether the whole of `haystack` is accepted.
    ///
    /// This is a depth-first search over pairs of a state and an input
    /// position, so it visits each pair at most once. [`Dfa`](crate::Dfa)
    /// matching is faster, one step per character.
    pub fn matches(&self, haystack: &str) -> bool {
        // A pair already seen has been explored, or is still on the stack
        // below us, and can't lead anywhere new.
        let mut visited: HashSet<(StateId, usize)> = HashSet::new();
        let mut stack = vec![(self.start, 0)];

        while let Some((id, at)) = stack.pop() {
            if !visited.insert((id, at)) {
                continue;
            }
            let state = &self.states[id];

            // Epsilon edges go on the stack first so that character edges
            // are followed first, each group in edge order.
            let epsilons: Vec<StateId> = state.transitions_on(Symbol::Epsilon).collect();
            stack.extend(epsilons.into_iter().rev().map(|next| (next, at)));

            match haystack[at..].chars().next() {
                None => {
                    if state.is_accepting() {
                        return true;
                    }
                }
                Some(c) => {
                    let after = at + c.len_utf8();
                    let nexts: Vec<StateId> = state.transitions_on(Symbol::Char(c)).collect();
                    stack.extend(nexts.into_iter().rev().map(|next| (next, after)));
                }
            }
        }
        false
    }

    /// States reachable from `id` through zero or more epsilon edges, `id`
    /// first.
    pub fn epsilon_closure(&self, id: StateId) -> &IndexSet<StateId> {
        &self.closures[id]
    }

    /// The table number of a state, `None` when it is unreachable from the
    /// entry state.
    pub fn number_of(&self, id: StateId) -> Option<StateNumber> {
        self.numbers[id]
    }

    /// Reachable accepting states, in discovery order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.order.iter().copied().filter(move |&id| self.states[id].is_accepting())
    }

    /// Table numbers of the reachable accepting states.
    pub fn accepting_state_numbers(&self) -> &BTreeSet<StateNumber> {
        self.table.accepting_state_numbers()
    }

    /// Every character that labels some reachable edge.
    pub fn alphabet(&self) -> &IndexSet<char> {
        self.table.alphabet()
    }

    /// The numbered transition table of the reachable states.
    pub fn transition_table(&self) -> &NfaTable {
        &self.table
    }
}

fn epsilon_closure(states: &[State], id: StateId) -> IndexSet<StateId> {
    let mut closure = IndexSet::new();
    let mut stack = vec![id];

    while let Some(next) = stack.pop() {
        if !closure.insert(next) {
            continue;
        }
        let neighbors = states[next].transitions_on(Symbol::Epsilon).collect::<Vec<_>>();
        stack.extend(neighbors.into_iter().rev());
    }

    closure
}

// Pushing children in reverse and marking on pop visits states in the same
// order as a recursive depth-first walk over the edges in insertion order.
fn discovery_order(states: &[State], start: StateId) -> Vec<StateId> {
    let mut seen = vec![false; states.len()];
    let mut order = Vec::new();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if seen[id] {
            continue;
        }
        seen[id] = true;
        order.push(id);

        let children = states[id]
            .transitions()
            .flat_map(|(_, set)| set.iter().copied())
            .collect::<Vec<_>>();
        stack.extend(children.into_iter().rev());
    }

    order
}

/// One row of an [`NfaTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaRow {
    transitions: IndexMap<char, Vec<StateNumber>>,
    epsilon_closure: Vec<StateNumber>,
}

impl NfaRow {
    /// Destination numbers on `c`, in edge order.
    pub fn transitions_on(&self, c: char) -> &[StateNumber] {
        self.transitions.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Character edges in first-use order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, &[StateNumber])> + '_ {
        self.transitions.iter().map(|(c, to)| (*c, to.as_slice()))
    }

    /// The numbers of this state's epsilon closure, itself included.
    pub fn epsilon_closure(&self) -> &[StateNumber] {
        &self.epsilon_closure
    }
}

/// The numbered view of an [`Nfa`].
///
/// States are numbered from 1 in depth-first discovery order starting at
/// the entry state, so the entry state is always number 1. Epsilon edges do
/// not appear directly: each row carries its state's epsilon closure instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaTable {
    rows: Vec<NfaRow>,
    accepting: BTreeSet<StateNumber>,
    alphabet: IndexSet<char>,
}

impl NfaTable {
    fn new(
        states: &[State],
        closures: &[IndexSet<StateId>],
        order: &[StateId],
        numbers: &[Option<StateNumber>],
    ) -> Self {
        let number = |id: &StateId| numbers[*id];

        let mut rows = Vec::with_capacity(order.len());
        let mut accepting = BTreeSet::new();
        let mut alphabet = IndexSet::new();

        for &id in order {
            let state = &states[id];
            let mut transitions = IndexMap::new();

            for (symbol, to) in state.transitions() {
                if let Symbol::Char(c) = symbol {
                    alphabet.insert(c);
                    transitions.insert(c, to.iter().filter_map(number).collect());
                }
            }

            if state.is_accepting() {
                accepting.extend(number(&id));
            }

            let epsilon_closure = closures[id].iter().filter_map(number).collect();
            rows.push(NfaRow { transitions, epsilon_closure });
        }

        NfaTable { rows, accepting, alphabet }
    }

    /// The number of rows, one per reachable state.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row of state `number`, if there is one.
    pub fn row(&self, number: StateNumber) -> Option<&NfaRow> {
        number.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    /// Rows with their state numbers, starting at 1.
    pub fn rows(&self) -> impl Iterator<Item = (StateNumber, &NfaRow)> + '_ {
        self.rows.iter().enumerate().map(|(index, row)| (index + 1, row))
    }

    /// Numbers of the accepting rows.
    pub fn accepting_state_numbers(&self) -> &BTreeSet<StateNumber> {
        &self.accepting
    }

    /// Characters in first-use order.
    pub fn alphabet(&self) -> &IndexSet<char> {
        &self.alphabet
    }
}

impl std::fmt::Display for NfaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (number, row) in self.rows() {
            let marker = if self.accepting.contains(&number) { "*" } else { " " };
            write!(f, "{}{}:", marker, number)?;
            for (c, to) in row.transitions() {
                write!(f, " {} -> {:?},", c, to)?;
            }
            writeln!(f, " {} -> {:?}", EPSILON_CLOSURE, row.epsilon_closure())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    // a*b with the in-place star.
    fn star_then_b() -> Nfa {
        let mut builder = Builder::new();
        let a = builder.char('a');
        let star = builder.rep(a);
        let b = builder.char('b');
        let whole = builder.alt_pair(star, b);
        builder.build(whole)
    }

    #[test]
    fn numbering_follows_discovery_order() {
        let nfa = star_then_b();
        let table = nfa.transition_table();

        // arena: 0 -a-> 1, 0 -ε-> 1, 1 -ε-> 0, 1 -ε-> 2, 2 -b-> 3
        assert_eq!(table.len(), 4);
        assert_eq!(nfa.number_of(0), Some(1));
        assert_eq!(nfa.number_of(1), Some(2));
        assert_eq!(nfa.number_of(2), Some(3));
        assert_eq!(nfa.number_of(3), Some(4));

        let first = table.row(1).unwrap();
        assert_eq!(first.transitions_on('a'), &[2]);
        assert_eq!(first.transitions_on('b'), &[] as &[StateNumber]);
        assert_eq!(first.epsilon_closure(), &[1, 2, 3]);

        let second = table.row(2).unwrap();
        assert_eq!(second.epsilon_closure(), &[2, 1, 3]);

        assert_eq!(table.row(4).unwrap().epsilon_closure(), &[4]);
        assert!(table.row(0).is_none());
        assert!(table.row(5).is_none());
    }

    #[test]
    fn alphabet_and_accepting_numbers() {
        let nfa = star_then_b();
        let alphabet: Vec<_> = nfa.alphabet().iter().copied().collect();
        assert_eq!(alphabet, vec!['a', 'b']);

        let accepting: Vec<_> = nfa.accepting_state_numbers().iter().copied().collect();
        assert_eq!(accepting, vec![4]);
        assert_eq!(nfa.accepting_states().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn unreachable_states_are_not_numbered() {
        let mut builder = Builder::new();
        let _unused = builder.char('x');
        let a = builder.char('a');
        let nfa = builder.build(a);

        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.transition_table().len(), 2);
        assert_eq!(nfa.number_of(0), None);
        assert_eq!(nfa.number_of(2), Some(1));
        assert!(!nfa.alphabet().contains(&'x'));
    }

    #[test]
    fn closure_is_transitive_on_cycles() {
        // 0 -ε-> 1, 1 -ε-> 0, 0 -ε-> 2: every state in the cycle reaches 2.
        let mut states = vec![State::new(false), State::new(false), State::new(true)];
        states[0].add_transition(Symbol::Epsilon, 1);
        states[1].add_transition(Symbol::Epsilon, 0);
        states[0].add_transition(Symbol::Epsilon, 2);
        let nfa = Nfa::new(states, 0, 2);

        let of_one: Vec<_> = nfa.epsilon_closure(1).iter().copied().collect();
        assert_eq!(of_one, vec![1, 0, 2]);
        assert!(nfa.matches(""));
    }

    #[test]
    fn backtracking_handles_epsilon_cycles() {
        let mut builder = Builder::new();
        let a = builder.char('a');
        let star = builder.rep(a);
        let star_star = builder.rep(star);
        let nfa = builder.build(star_star);

        assert!(nfa.matches(""));
        assert!(nfa.matches("aaa"));
        assert!(!nfa.matches("ab"));
    }

    #[test]
    fn long_input_does_not_exhaust_the_stack() {
        let mut builder = Builder::new();
        let a = builder.char('a');
        let star = builder.rep(a);
        let star_star = builder.rep(star);
        let nfa = builder.build(star_star);

        let long = "a".repeat(200_000);
        assert!(nfa.matches(&long));
        assert!(!nfa.matches(&format!("{}b", long)));
    }

    #[test]
    fn display_marks_accepting_rows() {
        let nfa = star_then_b();
        let shown = nfa.transition_table().to_string();
        let lines: Vec<_> = shown.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " 1: a -> [2], ε* -> [1, 2, 3]");
        assert!(lines[3].starts_with("*4:"));
    }
}
