use regex_syntax::ast::{
    self, parse::Parser, Ast, ErrorKind, GroupKind, LiteralKind, RepetitionKind,
    RepetitionRange, Span,
};

use crate::ast::{CharKind, Node, Quantifier, QuantifierKind};
use crate::{Error, Result};

/// Parse `pattern` into a [`Node::RegExp`].
///
/// Parsing is done by the `regex-syntax` AST parser. Most syntax the compiler
/// does not support still parses, into nodes the compiler later rejects.
/// Backreferences and look-around are refused by the parser itself and are
/// reported as [`Error::UnsupportedConstruct`]. Anything else that fails to
/// parse is [`Error::MalformedInput`]. Inline flags such as `(?i)` are
/// hoisted into the root's `flags`.
pub fn parse(pattern: &str) -> Result<Node> {
    let ast = Parser::new().parse(pattern).map_err(|err| parse_error(pattern, &err))?;

    let mut translator = Translator { pattern, flags: String::new() };
    let body = translator.node(&ast);

    Ok(Node::RegExp { flags: translator.flags, body: Box::new(body) })
}

fn parse_error(pattern: &str, err: &ast::Error) -> Error {
    let span = err.span();
    let text = pattern.get(span.start.offset..span.end.offset).unwrap_or(pattern);
    match err.kind() {
        ErrorKind::UnsupportedBackreference => {
            Error::UnsupportedConstruct(format!("Backreference node {:?}", text))
        }
        ErrorKind::UnsupportedLookAround => {
            Error::UnsupportedConstruct(format!("Assertion node {:?}", text))
        }
        _ => Error::MalformedInput(err.to_string()),
    }
}

struct Translator<'p> {
    pattern: &'p str,
    flags: String,
}

impl<'p> Translator<'p> {
    fn node(&mut self, ast: &Ast) -> Node {
        match ast {
            Ast::Empty(_) => Node::alternative(vec![]),
            Ast::Flags(set) => {
                self.add_flags(&set.flags.span);
                Node::alternative(vec![])
            }
            Ast::Literal(lit) => {
                let kind = match &lit.kind {
                    LiteralKind::Verbatim | LiteralKind::Meta | LiteralKind::Superfluous => {
                        CharKind::Simple
                    }
                    LiteralKind::Octal => CharKind::Octal,
                    LiteralKind::HexFixed(_) | LiteralKind::HexBrace(_) => CharKind::Hex,
                    _ => CharKind::Control,
                };
                Node::Char { kind, value: lit.c }
            }
            Ast::Dot(_) => Node::Char { kind: CharKind::Meta, value: '.' },
            Ast::Assertion(assertion) => Node::Assertion { text: self.text(&assertion.span) },
            Ast::ClassUnicode(class) => Node::CharacterClass { text: self.text(&class.span) },
            Ast::ClassPerl(class) => Node::CharacterClass { text: self.text(&class.span) },
            Ast::ClassBracketed(class) => Node::CharacterClass { text: self.text(&class.span) },
            Ast::Repetition(rep) => {
                let kind = match &rep.op.kind {
                    RepetitionKind::ZeroOrOne => QuantifierKind::ZeroOrOne,
                    RepetitionKind::ZeroOrMore => QuantifierKind::ZeroOrMore,
                    RepetitionKind::OneOrMore => QuantifierKind::OneOrMore,
                    RepetitionKind::Range(RepetitionRange::Exactly(n)) => {
                        QuantifierKind::Range { min: *n, max: Some(*n) }
                    }
                    RepetitionKind::Range(RepetitionRange::AtLeast(n)) => {
                        QuantifierKind::Range { min: *n, max: None }
                    }
                    RepetitionKind::Range(RepetitionRange::Bounded(min, max)) => {
                        QuantifierKind::Range { min: *min, max: Some(*max) }
                    }
                };
                Node::Repetition {
                    quantifier: Quantifier { kind, greedy: rep.greedy },
                    expression: Box::new(self.node(&rep.ast)),
                }
            }
            Ast::Group(group) => {
                let capturing = match &group.kind {
                    GroupKind::CaptureIndex(_) | GroupKind::CaptureName { .. } => true,
                    GroupKind::NonCapturing(flags) => {
                        if !flags.items.is_empty() {
                            self.add_flags(&flags.span);
                        }
                        false
                    }
                };
                Node::Group { capturing, expression: Box::new(self.node(&group.ast)) }
            }
            Ast::Alternation(alternation) => {
                let mut branches = alternation.asts.iter().map(|ast| self.node(ast)).collect::<Vec<_>>();
                let first = if branches.is_empty() {
                    Node::alternative(vec![])
                } else {
                    branches.remove(0)
                };
                branches.into_iter().fold(first, Node::disjunction)
            }
            Ast::Concat(concat) => {
                let mut expressions = Vec::with_capacity(concat.asts.len());
                for ast in &concat.asts {
                    if let Ast::Flags(set) = ast {
                        self.add_flags(&set.flags.span);
                    } else {
                        expressions.push(self.node(ast));
                    }
                }
                Node::alternative(expressions)
            }
        }
    }

    fn text(&self, span: &Span) -> String {
        self.pattern.get(span.start.offset..span.end.offset).unwrap_or_default().to_string()
    }

    fn add_flags(&mut self, span: &Span) {
        let text = self.text(span);
        self.flags.push_str(&text);
    }
}
