use crate::ast::{CharKind, Node, Quantifier, QuantifierKind};
use crate::builder::{Builder, Fragment};
use crate::nfa::Nfa;
use crate::{parse, Error, Result};

/// Compile an AST into a Thompson NFA.
pub fn compile(node: &Node) -> Result<Nfa> {
    Compiler::new().compile(node)
}

/// Parse `pattern` and compile it into a Thompson NFA.
///
/// Fails with [`Error::MalformedInput`] when the pattern does not parse and
/// with [`Error::UnsupportedConstruct`] when it uses syntax beyond literal
/// characters, concatenation, alternation, grouping, `*`, `+` and `?`.
pub fn build(pattern: &str) -> Result<Nfa> {
    let ast = parse::parse(pattern)?;
    compile(&ast)
}

/// Compiler that converts an AST into a Thompson NFA
pub struct Compiler {
    builder: Builder,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> Self {
        Self { builder: Builder::new() }
    }

    /// Compile `node`. Nothing is returned on error, not even a partial NFA.
    pub fn compile(mut self, node: &Node) -> Result<Nfa> {
        let fragment = self.compile_node(node)?;
        debug!("compiled {} into {} NFA states", node.type_name(), self.builder.len());
        Ok(self.builder.build(fragment))
    }

    fn compile_node(&mut self, node: &Node) -> Result<Fragment> {
        match node {
            Node::RegExp { flags, body } => {
                if !flags.is_empty() {
                    return Err(Error::UnsupportedConstruct(format!("flags \"{}\"", flags)));
                }
                self.compile_node(body)
            }
            Node::Alternative { expressions } => self.compile_alternative(expressions),
            Node::Disjunction { left, right } => {
                let left = self.compile_node(left)?;
                let right = self.compile_node(right)?;
                Ok(self.builder.or_pair(left, right))
            }
            Node::Repetition { quantifier, expression } => {
                self.compile_repetition(quantifier, expression)
            }
            Node::Char { kind, value } => self.compile_char(*kind, *value),
            Node::Group { expression, .. } => self.compile_node(expression),
            Node::CharacterClass { text }
            | Node::Assertion { text }
            | Node::Backreference { text } => Err(Error::UnsupportedConstruct(format!(
                "{} node \"{}\"",
                node.type_name(),
                text
            ))),
        }
    }

    /// Concatenation
    fn compile_alternative(&mut self, expressions: &[Node]) -> Result<Fragment> {
        let (first, rest) = expressions
            .split_first()
            .ok_or_else(|| Error::UnsupportedConstruct("empty expression".to_string()))?;

        let first = self.compile_node(first)?;
        let rest = rest.iter().map(|node| self.compile_node(node)).collect::<Result<Vec<_>>>()?;

        Ok(self.builder.alt(first, rest))
    }

    fn compile_repetition(&mut self, quantifier: &Quantifier, expression: &Node) -> Result<Fragment> {
        let fragment = self.compile_node(expression)?;
        match quantifier.kind {
            QuantifierKind::ZeroOrMore => Ok(self.builder.rep(fragment)),
            QuantifierKind::OneOrMore => Ok(self.builder.plus_rep(fragment)),
            QuantifierKind::ZeroOrOne => Ok(self.builder.question_rep(fragment)),
            QuantifierKind::Range { .. } => {
                Err(Error::UnsupportedConstruct(format!("repetition {}", quantifier.kind)))
            }
        }
    }

    fn compile_char(&mut self, kind: CharKind, value: char) -> Result<Fragment> {
        if kind != CharKind::Simple {
            return Err(Error::UnsupportedConstruct(format!("{} char {:?}", kind, value)));
        }
        Ok(self.builder.char(value))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
