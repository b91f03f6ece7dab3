use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::lexer::{MathLexer, MathToken};
use super::node::{AccentKind, MathNode, MathStyle, MatrixStyle, SpacingWidth};

/// Greek letter command names mapped to their literal glyph, so `\alpha`
/// becomes the same kind of [`MathNode::Symbol`] as a bare `α` typed
/// directly in the source.
static GREEK: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("alpha", "\u{03B1}"),
        ("beta", "\u{03B2}"),
        ("gamma", "\u{03B3}"),
        ("delta", "\u{03B4}"),
        ("epsilon", "\u{03B5}"),
        ("zeta", "\u{03B6}"),
        ("eta", "\u{03B7}"),
        ("theta", "\u{03B8}"),
        ("iota", "\u{03B9}"),
        ("kappa", "\u{03BA}"),
        ("lambda", "\u{03BB}"),
        ("mu", "\u{03BC}"),
        ("nu", "\u{03BD}"),
        ("xi", "\u{03BE}"),
        ("pi", "\u{03C0}"),
        ("rho", "\u{03C1}"),
        ("sigma", "\u{03C3}"),
        ("tau", "\u{03C4}"),
        ("upsilon", "\u{03C5}"),
        ("phi", "\u{03C6}"),
        ("chi", "\u{03C7}"),
        ("psi", "\u{03C8}"),
        ("omega", "\u{03C9}"),
        ("Gamma", "\u{0393}"),
        ("Delta", "\u{0394}"),
        ("Theta", "\u{0398}"),
        ("Lambda", "\u{039B}"),
        ("Xi", "\u{039E}"),
        ("Pi", "\u{03A0}"),
        ("Sigma", "\u{03A3}"),
        ("Upsilon", "\u{03A5}"),
        ("Phi", "\u{03A6}"),
        ("Psi", "\u{03A8}"),
        ("Omega", "\u{03A9}"),
    ])
});

/// Operator/relation command names mapped to their literal glyph.
static OPERATORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("times", "\u{00D7}"),
        ("cdot", "\u{22C5}"),
        ("div", "\u{00F7}"),
        ("pm", "\u{00B1}"),
        ("mp", "\u{2213}"),
        ("leq", "\u{2264}"),
        ("geq", "\u{2265}"),
        ("neq", "\u{2260}"),
        ("approx", "\u{2248}"),
        ("equiv", "\u{2261}"),
        ("sim", "\u{223C}"),
        ("in", "\u{2208}"),
        ("notin", "\u{2209}"),
        ("subset", "\u{2282}"),
        ("supset", "\u{2283}"),
        ("subseteq", "\u{2286}"),
        ("supseteq", "\u{2287}"),
        ("cup", "\u{222A}"),
        ("cap", "\u{2229}"),
        ("wedge", "\u{2227}"),
        ("vee", "\u{2228}"),
        ("neg", "\u{00AC}"),
        ("forall", "\u{2200}"),
        ("exists", "\u{2203}"),
        ("infty", "\u{221E}"),
        ("partial", "\u{2202}"),
        ("nabla", "\u{2207}"),
        ("sum", "\u{2211}"),
        ("prod", "\u{220F}"),
        ("int", "\u{222B}"),
        ("to", "\u{2192}"),
        ("rightarrow", "\u{2192}"),
        ("leftarrow", "\u{2190}"),
        ("leftrightarrow", "\u{2194}"),
        ("Rightarrow", "\u{21D2}"),
        ("Leftarrow", "\u{21D0}"),
        ("Leftrightarrow", "\u{21D4}"),
    ])
});

static FUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "sin", "cos", "tan", "cot", "sec", "csc", "log", "ln", "exp", "lim", "min", "max", "sup", "inf", "det", "gcd",
        "arg",
    ])
});

fn wrap_sequence(mut nodes: Vec<MathNode>) -> MathNode {
    match nodes.len() {
        0 => MathNode::Sequence(Vec::new()),
        1 => nodes.pop().unwrap(),
        _ => MathNode::Sequence(nodes),
    }
}

fn apply_style(node: MathNode, style: MathStyle) -> MathNode {
    match node {
        MathNode::Symbol { name, .. } => MathNode::Symbol { name, style: Some(style) },
        MathNode::Sequence(items) => MathNode::Sequence(items.into_iter().map(|n| apply_style(n, style)).collect()),
        other => other,
    }
}

/// Recursive-descent parser over a [`MathLexer`], using position
/// checkpoint/rewind for lookahead rather than a token buffer — the same
/// backtracking shape the teacher's inline parser uses around its own
/// delimiter matching.
struct MathParser<'a> {
    lexer: MathLexer<'a>,
}

impl<'a> MathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { lexer: MathLexer::new(input) }
    }

    fn parse_top_level(&mut self) -> Option<MathNode> {
        let mut nodes = Vec::new();
        loop {
            let checkpoint = self.lexer.position();
            match self.lexer.next_token() {
                MathToken::Eof => break,
                _ => {
                    self.lexer.set_position(checkpoint);
                    nodes.push(self.parse_scripted_atom()?);
                }
            }
        }
        Some(wrap_sequence(nodes))
    }

    fn parse_scripted_atom(&mut self) -> Option<MathNode> {
        let base = self.parse_atom()?;
        let mut sup = None;
        let mut sub = None;
        loop {
            let checkpoint = self.lexer.position();
            match self.lexer.next_token() {
                MathToken::Caret if sup.is_none() => sup = Some(self.parse_exponent_arg()?),
                MathToken::Underscore if sub.is_none() => sub = Some(self.parse_exponent_arg()?),
                _ => {
                    self.lexer.set_position(checkpoint);
                    break;
                }
            }
        }
        if sup.is_none() && sub.is_none() {
            Some(base)
        } else {
            Some(MathNode::Scripts { base: Box::new(base), sup: sup.map(Box::new), sub: sub.map(Box::new) })
        }
    }

    /// Parses the argument of `^`, `_`, or a style/accent command: a single
    /// brace group, or a single bare atom.
    fn parse_exponent_arg(&mut self) -> Option<MathNode> {
        let checkpoint = self.lexer.position();
        match self.lexer.next_token() {
            MathToken::LBrace => self.parse_sequence_until_rbrace(),
            _ => {
                self.lexer.set_position(checkpoint);
                self.parse_atom()
            }
        }
    }

    fn parse_sequence_until_rbrace(&mut self) -> Option<MathNode> {
        let mut nodes = Vec::new();
        loop {
            let checkpoint = self.lexer.position();
            match self.lexer.next_token() {
                MathToken::RBrace => break,
                MathToken::Eof => return None,
                _ => {
                    self.lexer.set_position(checkpoint);
                    nodes.push(self.parse_scripted_atom()?);
                }
            }
        }
        Some(wrap_sequence(nodes))
    }

    fn parse_sequence_until_right(&mut self) -> Option<MathNode> {
        let mut nodes = Vec::new();
        loop {
            let checkpoint = self.lexer.position();
            match self.lexer.next_token() {
                MathToken::Command(ref name) if name == "right" => break,
                MathToken::Eof => return None,
                _ => {
                    self.lexer.set_position(checkpoint);
                    nodes.push(self.parse_scripted_atom()?);
                }
            }
        }
        Some(wrap_sequence(nodes))
    }

    fn expect_brace_group(&mut self) -> Option<MathNode> {
        match self.lexer.next_token() {
            MathToken::LBrace => self.parse_sequence_until_rbrace(),
            _ => None,
        }
    }

    fn expect_env_name(&mut self) -> Option<String> {
        match self.lexer.next_token() {
            MathToken::LBrace => {}
            _ => return None,
        }
        let name = match self.lexer.next_token() {
            MathToken::Symbol(s) => s,
            _ => return None,
        };
        match self.lexer.next_token() {
            MathToken::RBrace => Some(name),
            _ => None,
        }
    }

    fn parse_environment_rows(&mut self, env: &str) -> Option<Vec<Vec<MathNode>>> {
        let mut rows = Vec::new();
        let mut current_row: Vec<MathNode> = Vec::new();
        let mut current_cell: Vec<MathNode> = Vec::new();
        loop {
            let checkpoint = self.lexer.position();
            match self.lexer.next_token() {
                MathToken::Ampersand => {
                    current_row.push(wrap_sequence(std::mem::take(&mut current_cell)));
                }
                MathToken::Newline => {
                    current_row.push(wrap_sequence(std::mem::take(&mut current_cell)));
                    rows.push(std::mem::take(&mut current_row));
                }
                MathToken::Command(ref name) if name == "end" => {
                    current_row.push(wrap_sequence(std::mem::take(&mut current_cell)));
                    rows.push(std::mem::take(&mut current_row));
                    let end_name = self.expect_env_name()?;
                    if end_name != env {
                        return None;
                    }
                    break;
                }
                MathToken::Eof => return None,
                _ => {
                    self.lexer.set_position(checkpoint);
                    current_cell.push(self.parse_scripted_atom()?);
                }
            }
        }
        Some(rows)
    }

    fn parse_atom(&mut self) -> Option<MathNode> {
        match self.lexer.next_token() {
            MathToken::Number(s) => Some(MathNode::Number(s)),
            MathToken::Symbol(s) => Some(MathNode::Symbol { name: s, style: None }),
            MathToken::LBrace => self.parse_sequence_until_rbrace(),
            MathToken::LParen => Some(MathNode::Symbol { name: "(".to_string(), style: None }),
            MathToken::RParen => Some(MathNode::Symbol { name: ")".to_string(), style: None }),
            MathToken::LBracket => Some(MathNode::Symbol { name: "[".to_string(), style: None }),
            MathToken::RBracket => Some(MathNode::Symbol { name: "]".to_string(), style: None }),
            MathToken::Comma => Some(MathNode::Operator(",".to_string())),
            MathToken::Space(w) => Some(MathNode::Spacing(w)),
            MathToken::Command(name) => self.parse_command(&name),
            MathToken::RBrace
            | MathToken::Caret
            | MathToken::Underscore
            | MathToken::Ampersand
            | MathToken::Newline
            | MathToken::Eof => None,
        }
    }

    fn parse_command(&mut self, name: &str) -> Option<MathNode> {
        match name {
            "frac" => {
                let numerator = self.expect_brace_group()?;
                let denominator = self.expect_brace_group()?;
                Some(MathNode::Fraction { numerator: Box::new(numerator), denominator: Box::new(denominator) })
            }
            "binom" => {
                let top = self.expect_brace_group()?;
                let bottom = self.expect_brace_group()?;
                Some(MathNode::Binomial { top: Box::new(top), bottom: Box::new(bottom) })
            }
            "sqrt" => {
                let checkpoint = self.lexer.position();
                let index = match self.lexer.next_token() {
                    MathToken::LBracket => {
                        let mut nodes = Vec::new();
                        loop {
                            let inner_checkpoint = self.lexer.position();
                            match self.lexer.next_token() {
                                MathToken::RBracket => break,
                                MathToken::Eof => return None,
                                _ => {
                                    self.lexer.set_position(inner_checkpoint);
                                    nodes.push(self.parse_scripted_atom()?);
                                }
                            }
                        }
                        Some(Box::new(wrap_sequence(nodes)))
                    }
                    _ => {
                        self.lexer.set_position(checkpoint);
                        None
                    }
                };
                let radicand = self.expect_brace_group()?;
                Some(MathNode::Sqrt { index, radicand: Box::new(radicand) })
            }
            "text" => {
                match self.lexer.next_token() {
                    MathToken::LBrace => {}
                    _ => return None,
                }
                let literal = self.lexer.lex_text_literal();
                match self.lexer.next_token() {
                    MathToken::RBrace => Some(MathNode::Text(literal)),
                    _ => None,
                }
            }
            "mathrm" => Some(apply_style(self.parse_exponent_arg()?, MathStyle::Roman)),
            "mathbf" => Some(apply_style(self.parse_exponent_arg()?, MathStyle::Bold)),
            "mathit" => Some(apply_style(self.parse_exponent_arg()?, MathStyle::Italic)),
            "hat" => Some(MathNode::Accent { kind: AccentKind::Hat, base: Box::new(self.parse_exponent_arg()?) }),
            "bar" => Some(MathNode::Accent { kind: AccentKind::Bar, base: Box::new(self.parse_exponent_arg()?) }),
            "overline" => {
                Some(MathNode::Accent { kind: AccentKind::Overline, base: Box::new(self.parse_exponent_arg()?) })
            }
            "vec" => Some(MathNode::Accent { kind: AccentKind::Vec, base: Box::new(self.parse_exponent_arg()?) }),
            "left" => {
                let left = self.lexer.lex_delimiter()?;
                let body = self.parse_sequence_until_right()?;
                let right = self.lexer.lex_delimiter()?;
                Some(MathNode::Delimiter { left, body: Box::new(body), right })
            }
            "begin" => {
                let env = self.expect_env_name()?;
                let rows = self.parse_environment_rows(&env)?;
                Some(match env.as_str() {
                    "matrix" => MathNode::Matrix { style: MatrixStyle::Plain, rows },
                    "pmatrix" => MathNode::Matrix { style: MatrixStyle::Paren, rows },
                    "cases" => MathNode::Cases { rows },
                    "aligned" => MathNode::Aligned { rows },
                    _ => return None,
                })
            }
            "right" | "end" => None,
            _ if FUNCTIONS.contains(name) => {
                let arg = self.parse_atom()?;
                Some(MathNode::Function { name: name.to_string(), arg: Box::new(arg) })
            }
            _ if GREEK.contains_key(name) => {
                Some(MathNode::Symbol { name: GREEK[name].to_string(), style: None })
            }
            _ if OPERATORS.contains_key(name) => Some(MathNode::Operator(OPERATORS[name].to_string())),
            _ => Some(MathNode::Symbol { name: name.to_string(), style: None }),
        }
    }
}

/// Parses a TeX-subset span into a [`MathNode`] tree. Never fails: any
/// structural error (unbalanced braces, mismatched `\left`/`\right`,
/// mismatched environment names) falls back to a single
/// [`MathNode::Text`] holding the trimmed, unparsed source (`spec.md` §4.3).
pub fn parse(input: &str) -> MathNode {
    let mut parser = MathParser::new(input);
    match parser.parse_top_level() {
        Some(node) => node,
        None => MathNode::Text(input.trim().to_string()),
    }
}
