use serde::{Deserialize, Serialize};

/// A recursive-descent-parsed TeX-subset expression tree (`spec.md` §3,
/// §4.3). Attached as a structured payload to inline/block math runs; never
/// surfaces a parse error — see [`super::parse`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MathNode {
    Sequence(Vec<MathNode>),
    Symbol {
        name: String,
        style: Option<MathStyle>,
    },
    Number(String),
    Operator(String),
    Function {
        name: String,
        arg: Box<MathNode>,
    },
    Fraction {
        numerator: Box<MathNode>,
        denominator: Box<MathNode>,
    },
    Sqrt {
        index: Option<Box<MathNode>>,
        radicand: Box<MathNode>,
    },
    Scripts {
        base: Box<MathNode>,
        sup: Option<Box<MathNode>>,
        sub: Option<Box<MathNode>>,
    },
    Delimiter {
        left: DelimiterGlyph,
        body: Box<MathNode>,
        right: DelimiterGlyph,
    },
    Matrix {
        style: MatrixStyle,
        rows: Vec<Vec<MathNode>>,
    },
    Text(String),
    Spacing(SpacingWidth),
    Accent {
        kind: AccentKind,
        base: Box<MathNode>,
    },
    Binomial {
        top: Box<MathNode>,
        bottom: Box<MathNode>,
    },
    Cases {
        rows: Vec<Vec<MathNode>>,
    },
    Aligned {
        rows: Vec<Vec<MathNode>>,
    },
}

/// A retagging applied to symbol nodes by `\mathrm`, `\mathbf`, `\mathit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathStyle {
    Roman,
    Bold,
    Italic,
}

/// Width of a `\,`/`\;`/`\quad`-style explicit space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacingWidth {
    Thin,
    Medium,
    Quad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccentKind {
    Hat,
    Bar,
    Overline,
    Vec,
}

/// Distinguishes `\begin{matrix}` from `\begin{pmatrix}`; `cases` and
/// `aligned` are their own [`MathNode`] variants since their layout rules
/// differ from a plain/bracketed grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixStyle {
    Plain,
    Paren,
}

/// One glyph from the fixed `\left`/`\right` delimiter alphabet in
/// `spec.md` §4.3. `None` is the `.` ("no delimiter") case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelimiterGlyph {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Pipe,
    DoublePipe,
    LAngle,
    RAngle,
    None,
}

impl DelimiterGlyph {
    /// Parses one `\left`/`\right` delimiter token, given the raw text
    /// immediately following the keyword (already stripped of
    /// leading/trailing whitespace by the caller).
    pub(super) fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "(" => Self::LParen,
            ")" => Self::RParen,
            "[" => Self::LBracket,
            "]" => Self::RBracket,
            "{" => Self::LBrace,
            "}" => Self::RBrace,
            "|" => Self::Pipe,
            "||" => Self::DoublePipe,
            "langle" => Self::LAngle,
            "rangle" => Self::RAngle,
            "." => Self::None,
            _ => return None,
        })
    }
}
