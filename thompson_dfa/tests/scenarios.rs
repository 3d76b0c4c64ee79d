use thompson_dfa::{build, Dfa, Error, Nfa};

use crate::init_logging;

fn both(pattern: &str) -> anyhow::Result<(Nfa, Dfa)> {
    init_logging();
    let nfa = build(pattern)?;
    let dfa = Dfa::new(&nfa);
    Ok((nfa, dfa))
}

fn check(pattern: &str, accepted: &[&str], rejected: &[&str]) -> anyhow::Result<()> {
    let (nfa, dfa) = both(pattern)?;
    for s in accepted {
        assert!(nfa.matches(s), "NFA for {:?} rejected {:?}", pattern, s);
        assert!(dfa.matches(s), "DFA for {:?} rejected {:?}", pattern, s);
    }
    for s in rejected {
        assert!(!nfa.matches(s), "NFA for {:?} accepted {:?}", pattern, s);
        assert!(!dfa.matches(s), "DFA for {:?} accepted {:?}", pattern, s);
    }
    Ok(())
}

// Every string over `alphabet` of length at most `max_len`.
fn strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for &c in alphabet {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[test]
fn single_char() -> anyhow::Result<()> {
    check("a", &["a"], &["b", "", "aa"])
}

#[test]
fn star() -> anyhow::Result<()> {
    check("a*", &["", "a", "aaa"], &["b", "ab"])
}

#[test]
fn alternation() -> anyhow::Result<()> {
    check("a|b", &["a", "b"], &["ab", "", "c"])
}

#[test]
fn group_plus() -> anyhow::Result<()> {
    check("(ab)+", &["ab", "abab"], &["a", "", "aba", "ba"])
}

#[test]
fn optional() -> anyhow::Result<()> {
    check("ab?", &["a", "ab"], &["abb", "b", ""])
}

#[test]
fn textbook_pattern() -> anyhow::Result<()> {
    check("(a|b)*abb", &["abb", "aabb", "babb", "ababb"], &["ab", "abba", "", "bb"])
}

#[test]
fn nested_quantifiers() -> anyhow::Result<()> {
    check("(a*b?)*c", &["c", "ac", "bc", "abababc", "aaac"], &["", "ab", "cc"])?;
    check("((a|b)?c)+", &["c", "ac", "bcacc"], &["", "a", "ca"])
}

#[test]
fn escaped_meta_characters() -> anyhow::Result<()> {
    check(r"\(a\)\*", &["(a)*"], &["a", "(a)", "(a))"])
}

#[test]
fn non_ascii_literals() -> anyhow::Result<()> {
    check("é+ε", &["éε", "ééε"], &["ε", "é", "e"])
}

#[test]
fn dfa_agrees_with_nfa_exhaustively() -> anyhow::Result<()> {
    let inputs = strings(&['a', 'b', 'c'], 5);
    for pattern in ["(a|b)*abb", "a(b|c)*a?", "((ab)*|c+)?b", "(a?)+b*"] {
        let (nfa, dfa) = both(pattern)?;
        for s in &inputs {
            assert_eq!(nfa.matches(s), dfa.matches(s), "pattern {:?}, input {:?}", pattern, s);
        }
    }
    Ok(())
}

#[test]
fn tables_are_exposed() -> anyhow::Result<()> {
    let (nfa, dfa) = both("(a|b)*abb")?;

    let alphabet: Vec<char> = nfa.alphabet().iter().copied().collect();
    assert_eq!(alphabet, vec!['a', 'b']);
    assert_eq!(dfa.alphabet(), nfa.alphabet());

    let table = nfa.transition_table();
    assert_eq!(table.row(1).map(|row| row.epsilon_closure()[0]), Some(1));
    assert_eq!(nfa.accepting_state_numbers().len(), 1);

    assert!(dfa.transition_table().contains_key(&1));
    assert!(!dfa.accepting_state_numbers().is_empty());
    assert_eq!(dfa.len(), dfa.original_transition_table().map_or(0, |t| t.len()));
    Ok(())
}

#[test]
fn errors() {
    match build("a(") {
        Err(err @ Error::MalformedInput(_)) => {
            assert!(err.to_string().starts_with("malformed input: "));
        }
        other => panic!("{:?}", other.is_ok()),
    }

    match build("[ab]c") {
        Err(err @ Error::UnsupportedConstruct(_)) => {
            assert_eq!(err.to_string(), "unsupported construct: CharacterClass node \"[ab]\"");
        }
        other => panic!("{:?}", other.is_ok()),
    }

    for pattern in [r"(a)\1", "(?=a)b"] {
        match build(pattern) {
            Err(Error::UnsupportedConstruct(_)) => {}
            other => panic!("{:?} gave ok={:?}", pattern, other.is_ok()),
        }
    }
}

#[test]
fn long_inputs() -> anyhow::Result<()> {
    let (nfa, dfa) = both("a*")?;
    let long = "a".repeat(100_000);
    assert!(nfa.matches(&long));
    assert!(dfa.matches(&long));

    let (nfa, dfa) = both("(a|b)*abb")?;
    let long = format!("{}abb", "ab".repeat(50_000));
    assert!(nfa.matches(&long));
    assert!(dfa.matches(&long));
    assert!(!nfa.matches(&long[..long.len() - 1]));
    Ok(())
}

#[test]
fn automata_can_be_shared_between_threads() -> anyhow::Result<()> {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let (nfa, dfa) = both("(ab)+")?;
    assert_send_sync(&nfa);
    assert_send_sync(&dfa);

    let handle = std::thread::spawn(move || dfa.matches("abab") && nfa.matches("ab"));
    assert!(handle.join().unwrap());
    Ok(())
}
