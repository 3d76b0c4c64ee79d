//! The regular expression AST consumed by the [`Compiler`](crate::Compiler).
//!
//! The shape follows the usual "regexp tree" layout: a `RegExp` root holding
//! flags and a body, `Alternative` for concatenation, binary `Disjunction`
//! for alternation, `Repetition`, `Group` and `Char`. The remaining variants
//! exist so that a front end can describe syntax the compiler refuses.

/// A node of a regular expression AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The root of a pattern.
    RegExp { flags: String, body: Box<Node> },
    /// Concatenation of the expressions, in order.
    Alternative { expressions: Vec<Node> },
    /// `left|right`
    Disjunction { left: Box<Node>, right: Box<Node> },
    Repetition { quantifier: Quantifier, expression: Box<Node> },
    /// A single character.
    Char { kind: CharKind, value: char },
    /// A parenthesized expression.
    Group { capturing: bool, expression: Box<Node> },
    /// A bracketed, Perl or Unicode class such as `[a-z]` or `\d`.
    CharacterClass { text: String },
    /// A zero-width assertion such as `^` or `\b`.
    Assertion { text: String },
    Backreference { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub greedy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
    /// `{min}`, `{min,}` or `{min,max}`
    Range { min: u32, max: Option<u32> },
}

impl std::fmt::Display for QuantifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantifierKind::ZeroOrMore => write!(f, "*"),
            QuantifierKind::OneOrMore => write!(f, "+"),
            QuantifierKind::ZeroOrOne => write!(f, "?"),
            QuantifierKind::Range { min, max: None } => write!(f, "{{{},}}", min),
            QuantifierKind::Range { min, max: Some(max) } if min == max => write!(f, "{{{}}}", min),
            QuantifierKind::Range { min, max: Some(max) } => write!(f, "{{{},{}}}", min, max),
        }
    }
}

/// How a character was written in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    /// Written as itself, or as an escaped meta character like `\.`.
    Simple,
    /// The `.` wildcard.
    Meta,
    /// A control escape like `\n` or `\t`.
    Control,
    /// `\x41`, `\u0041` or `\x{41}`
    Hex,
    /// `\101`
    Octal,
}

impl std::fmt::Display for CharKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CharKind::Simple => "simple",
            CharKind::Meta => "meta",
            CharKind::Control => "control",
            CharKind::Hex => "hex",
            CharKind::Octal => "oct",
        };
        write!(f, "{}", name)
    }
}

impl Node {
    /// The node's type name, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::RegExp { .. } => "RegExp",
            Node::Alternative { .. } => "Alternative",
            Node::Disjunction { .. } => "Disjunction",
            Node::Repetition { .. } => "Repetition",
            Node::Char { .. } => "Char",
            Node::Group { .. } => "Group",
            Node::CharacterClass { .. } => "CharacterClass",
            Node::Assertion { .. } => "Assertion",
            Node::Backreference { .. } => "Backreference",
        }
    }

    /// A root node without flags.
    pub fn regexp(body: Node) -> Node {
        Node::RegExp { flags: String::new(), body: Box::new(body) }
    }

    /// A concatenation.
    pub fn alternative(expressions: Vec<Node>) -> Node {
        Node::Alternative { expressions }
    }

    /// An alternation of two branches.
    pub fn disjunction(left: Node, right: Node) -> Node {
        Node::Disjunction { left: Box::new(left), right: Box::new(right) }
    }

    /// A greedy repetition.
    pub fn repetition(kind: QuantifierKind, expression: Node) -> Node {
        Node::Repetition {
            quantifier: Quantifier { kind, greedy: true },
            expression: Box::new(expression),
        }
    }

    /// A simple literal character.
    pub fn char(value: char) -> Node {
        Node::Char { kind: CharKind::Simple, value }
    }

    /// A capturing group.
    pub fn group(expression: Node) -> Node {
        Node::Group { capturing: true, expression: Box::new(expression) }
    }
}
