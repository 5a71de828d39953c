// SPDX-License-Identifier: AGPL-3.0-or-later
//! LaTeX token scanner
//!
//! A deliberately small tokenizer: it knows control words (`\section`),
//! control symbols (`\\`, `\[`, `\{`), group braces and everything else as
//! text runs. Tokens keep their byte offsets so callers can copy untouched
//! source verbatim.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Backslash followed by ASCII letters, e.g. `\textbf` (name excludes `\`)
    ControlWord(&'a str),
    /// Backslash followed by a single non-letter, e.g. `\\` or `\[`
    ControlSymbol(&'a str),
    BeginGroup,
    EndGroup,
    /// A run of characters containing no `\`, `{` or `}`
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    /// Name of the control sequence, if this token is one
    pub fn control_name(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::ControlWord(name) | TokenKind::ControlSymbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_control_word(&self, name: &str) -> bool {
        matches!(self.kind, TokenKind::ControlWord(word) if word == name)
    }
}

#[derive(Debug, Clone)]
pub struct LatexScanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> LatexScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Start scanning at byte offset `pos`
    pub fn at(source: &'a str, pos: usize) -> Self {
        Self { source, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Jump to byte offset `pos`; must be a char boundary
    pub fn seek(&mut self, pos: usize) {
        debug_assert!(self.source.is_char_boundary(pos));
        self.pos = pos;
    }
}

impl<'a> Iterator for LatexScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.source[self.pos..];
        let first = rest.chars().next()?;
        let start = self.pos;

        let (kind, len) = match first {
            '\\' => {
                let after = &rest[1..];
                let letters = after
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(after.len());
                if letters > 0 {
                    (TokenKind::ControlWord(&after[..letters]), 1 + letters)
                } else if let Some(symbol) = after.chars().next() {
                    let len = symbol.len_utf8();
                    (TokenKind::ControlSymbol(&after[..len]), 1 + len)
                } else {
                    // Lone trailing backslash
                    (TokenKind::Text(rest), rest.len())
                }
            }
            '{' => (TokenKind::BeginGroup, 1),
            '}' => (TokenKind::EndGroup, 1),
            _ => {
                let len = rest
                    .find(|c: char| matches!(c, '\\' | '{' | '}'))
                    .unwrap_or(rest.len());
                (TokenKind::Text(&rest[..len]), len)
            }
        };

        self.pos += len;
        Some(Token {
            kind,
            start,
            end: self.pos,
        })
    }
}

/// Balanced brace group starting exactly at `pos`
///
/// Returns the inner text and the offset just past the closing brace, or
/// `None` when `pos` is not a `{` or the group never closes. Escaped braces
/// (`\{`, `\}`) do not count towards nesting.
pub fn group_at(source: &str, pos: usize) -> Option<(&str, usize)> {
    let mut scanner = LatexScanner::at(source, pos);
    let open = scanner.next()?;
    if open.kind != TokenKind::BeginGroup {
        return None;
    }

    let mut depth = 1usize;
    for token in scanner {
        match token.kind {
            TokenKind::BeginGroup => depth += 1,
            TokenKind::EndGroup => {
                depth -= 1;
                if depth == 0 {
                    return Some((&source[open.end..token.start], token.end));
                }
            }
            _ => {}
        }
    }
    None
}

/// Bracketed optional argument (`[...]`) starting exactly at `pos`
pub fn bracket_at(source: &str, pos: usize) -> Option<(&str, usize)> {
    let rest = source.get(pos..)?;
    if !rest.starts_with('[') {
        return None;
    }
    let close = rest.find(']')?;
    Some((&rest[1..close], pos + close + 1))
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::ControlWord(name) | TokenKind::ControlSymbol(name) => write!(f, "\\{name}"),
            TokenKind::BeginGroup => write!(f, "{{"),
            TokenKind::EndGroup => write!(f, "}}"),
            TokenKind::Text(text) => write!(f, "{text}"),
        }
    }
}
