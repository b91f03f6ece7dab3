use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use super::node::{DelimiterGlyph, SpacingWidth};

/// One token of the TeX subset lexed by [`MathLexer`] (`spec.md` §4.3).
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MathToken {
    Symbol(String),
    Number(String),
    Command(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Caret,
    Underscore,
    Ampersand,
    Comma,
    Newline,
    Space(SpacingWidth),
    Eof,
}

/// A conservative recursive-descent-friendly lexer over a single, complete
/// TeX-subset span. Unlike the Markdown tokenizer, math parsing is
/// synchronous within one inline/block math payload (`spec.md` §5), so this
/// lexer never needs to suspend mid-token across calls — it simply walks a
/// `&str` that is already fully available.
pub(crate) struct MathLexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> MathLexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn is_identifier_char(c: char) -> bool {
        unicode_xid::UnicodeXID::is_xid_continue(c) || c.general_category_group() == GeneralCategoryGroup::Letter
    }

    /// Reads the next token, skipping any leading plain whitespace (math
    /// mode treats bare whitespace as insignificant; only the explicit
    /// `\,`/`\;`/`\quad` escapes produce spacing nodes).
    pub(crate) fn next_token(&mut self) -> MathToken {
        self.skip_whitespace();
        let Some(c) = self.peek_char() else {
            return MathToken::Eof;
        };

        match c {
            '{' => {
                self.bump();
                MathToken::LBrace
            }
            '}' => {
                self.bump();
                MathToken::RBrace
            }
            '[' => {
                self.bump();
                MathToken::LBracket
            }
            ']' => {
                self.bump();
                MathToken::RBracket
            }
            '(' => {
                self.bump();
                MathToken::LParen
            }
            ')' => {
                self.bump();
                MathToken::RParen
            }
            '^' => {
                self.bump();
                MathToken::Caret
            }
            '_' => {
                self.bump();
                MathToken::Underscore
            }
            '&' => {
                self.bump();
                MathToken::Ampersand
            }
            ',' => {
                self.bump();
                MathToken::Comma
            }
            '\\' => self.lex_backslash(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if Self::is_identifier_char(c) => self.lex_symbol(),
            _ => {
                // Unrecognized punctuation becomes its own single-character
                // symbol rather than aborting the whole parse; the parser's
                // error recovery falls back to raw text if nothing sensible
                // can be built from it.
                self.bump();
                MathToken::Symbol(c.to_string())
            }
        }
    }

    fn lex_number(&mut self) -> MathToken {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        MathToken::Number(self.input[start..self.pos].to_string())
    }

    fn lex_symbol(&mut self) -> MathToken {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if Self::is_identifier_char(c)) {
            self.bump();
        }
        MathToken::Symbol(self.input[start..self.pos].to_string())
    }

    fn lex_backslash(&mut self) -> MathToken {
        self.pos += 1; // consume '\'
        match self.peek_char() {
            Some(',') => {
                self.pos += 1;
                MathToken::Space(SpacingWidth::Thin)
            }
            Some(';') | Some(' ') => {
                self.pos += 1;
                MathToken::Space(SpacingWidth::Medium)
            }
            Some('{') => {
                self.pos += 1;
                MathToken::Symbol("{".to_string())
            }
            Some('}') => {
                self.pos += 1;
                MathToken::Symbol("}".to_string())
            }
            Some('[') => {
                self.pos += 1;
                MathToken::Symbol("[".to_string())
            }
            Some(']') => {
                self.pos += 1;
                MathToken::Symbol("]".to_string())
            }
            Some('|') => {
                self.pos += 1;
                MathToken::Symbol("\u{2225}".to_string()) // PARALLEL TO (double pipe)
            }
            Some('%') => {
                while matches!(self.peek_char(), Some(c) if c != '\n') {
                    self.pos += 1;
                }
                self.next_token()
            }
            Some('\\') => {
                self.pos += 1;
                MathToken::Newline
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let start = self.pos;
                while matches!(self.peek_char(), Some(c) if c.is_ascii_alphabetic()) {
                    self.pos += 1;
                }
                let name = &self.input[start..self.pos];
                if name == "quad" {
                    MathToken::Space(SpacingWidth::Quad)
                } else {
                    MathToken::Command(name.to_string())
                }
            }
            Some(c) => {
                self.pos += c.len_utf8();
                MathToken::Command(c.to_string())
            }
            None => MathToken::Command(String::new()),
        }
    }

    /// Scans the body of a `\text{...}` group as a literal string, allowing
    /// only symbols, numbers and spaces per `spec.md` §4.3. Consumes up to
    /// (but not including) the matching unescaped `}`.
    pub(crate) fn lex_text_literal(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0i32;
        while let Some(c) = self.peek_char() {
            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' if depth == 0 => break,
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                _ => self.pos += c.len_utf8(),
            }
        }
        self.input[start..self.pos].to_string()
    }

    /// Scans one `\left`/`\right` delimiter glyph directly from the raw
    /// source, bypassing normal tokenization: the delimiter alphabet
    /// (`spec.md` §4.3) mixes bare punctuation, escaped punctuation, and
    /// named commands in a way no single token variant captures cleanly.
    pub(crate) fn lex_delimiter(&mut self) -> Option<DelimiterGlyph> {
        self.skip_whitespace();
        match self.peek_char()? {
            '\\' => {
                self.pos += 1;
                match self.peek_char()? {
                    '{' => {
                        self.pos += 1;
                        Some(DelimiterGlyph::LBrace)
                    }
                    '}' => {
                        self.pos += 1;
                        Some(DelimiterGlyph::RBrace)
                    }
                    '|' => {
                        self.pos += 1;
                        Some(DelimiterGlyph::DoublePipe)
                    }
                    c if c.is_ascii_alphabetic() => {
                        let start = self.pos;
                        while matches!(self.peek_char(), Some(c) if c.is_ascii_alphabetic()) {
                            self.pos += 1;
                        }
                        DelimiterGlyph::from_token(&self.input[start..self.pos])
                    }
                    _ => None,
                }
            }
            '.' => {
                self.pos += 1;
                Some(DelimiterGlyph::None)
            }
            c @ ('(' | ')' | '[' | ']' | '|') => {
                self.pos += c.len_utf8();
                DelimiterGlyph::from_token(&c.to_string())
            }
            _ => None,
        }
    }
}
