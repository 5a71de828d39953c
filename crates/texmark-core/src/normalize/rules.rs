// SPDX-License-Identifier: AGPL-3.0-or-later
//! LaTeX to Markdown rewrite rules
//!
//! Each rule is a whole-text pass. The table order matters: a later rule must
//! never see text it would re-match that an earlier rule produced.

use super::ListContext;
use crate::scanner::{bracket_at, group_at, LatexScanner, TokenKind};
use crate::traits::{NormalizeConfig, Numbering};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a rule in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Sections,
    Emphasis,
    Lists,
    Spacing,
    TextWrapper,
    HorizontalSpace,
    CollapseBlankLines,
}

impl RuleKind {
    /// All rules in application order
    pub const ALL: [Self; 7] = [
        Self::Sections,
        Self::Emphasis,
        Self::Lists,
        Self::Spacing,
        Self::TextWrapper,
        Self::HorizontalSpace,
        Self::CollapseBlankLines,
    ];
}

/// Argument shape following a command name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// Bare command, e.g. `\quad`
    Absent,
    /// Non-empty balanced `{...}`; the command is left alone without one
    Required,
    /// Optional `[...]`, e.g. `\\[2pt]`
    Optional,
}

/// What a command pattern matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captures<'a> {
    pub name: &'a str,
    pub starred: bool,
    pub argument: Option<&'a str>,
}

pub type Rewrite = fn(&Captures<'_>, &NormalizeConfig) -> String;

#[derive(Clone, Copy)]
pub enum MatchPattern {
    /// A control sequence from `names`, optionally starred, with an argument
    Command {
        names: &'static [&'static str],
        starred: bool,
        argument: Argument,
        rewrite: Rewrite,
    },
    /// `itemize`/`enumerate` boundaries and `\item` markers
    ListEnvironments,
    /// Whitespace runs holding three or more newlines
    BlankLineRuns,
}

#[derive(Debug, Clone, Copy)]
pub struct MacroRule {
    pub kind: RuleKind,
    pub patterns: &'static [MatchPattern],
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPattern::Command {
                names,
                starred,
                argument,
                ..
            } => f
                .debug_struct("Command")
                .field("names", names)
                .field("starred", starred)
                .field("argument", argument)
                .finish_non_exhaustive(),
            MatchPattern::ListEnvironments => f.write_str("ListEnvironments"),
            MatchPattern::BlankLineRuns => f.write_str("BlankLineRuns"),
        }
    }
}

impl MacroRule {
    pub fn apply(&self, text: &str, config: &NormalizeConfig, lists: &mut ListContext) -> String {
        let mut output = text.to_string();
        for pattern in self.patterns {
            output = match *pattern {
                MatchPattern::Command {
                    names,
                    starred,
                    argument,
                    rewrite,
                } => rewrite_commands(&output, names, starred, argument, rewrite, config),
                MatchPattern::ListEnvironments => rewrite_lists(&output, config, lists),
                MatchPattern::BlankLineRuns => collapse_blank_lines(&output),
            };
        }
        output
    }
}

fn heading(captures: &Captures<'_>, config: &NormalizeConfig) -> String {
    let level = config.heading_level.clamp(1, 6) as usize;
    format!("{} {}", "#".repeat(level), captures.argument.unwrap_or_default())
}

fn strong(captures: &Captures<'_>, _: &NormalizeConfig) -> String {
    format!("**{}**", captures.argument.unwrap_or_default())
}

fn emphasis(captures: &Captures<'_>, _: &NormalizeConfig) -> String {
    format!("*{}*", captures.argument.unwrap_or_default())
}

fn paragraph_break(_: &Captures<'_>, _: &NormalizeConfig) -> String {
    "\n\n".to_string()
}

fn line_break(_: &Captures<'_>, _: &NormalizeConfig) -> String {
    "\n".to_string()
}

fn unwrap_argument(captures: &Captures<'_>, _: &NormalizeConfig) -> String {
    captures.argument.unwrap_or_default().to_string()
}

fn horizontal_space(captures: &Captures<'_>, config: &NormalizeConfig) -> String {
    let width = match captures.name {
        "qquad" => config.quad_width * 2,
        _ => config.quad_width,
    };
    " ".repeat(width)
}

static RULES: [MacroRule; 7] = [
    MacroRule {
        kind: RuleKind::Sections,
        patterns: &[MatchPattern::Command {
            names: &["section"],
            starred: true,
            argument: Argument::Required,
            rewrite: heading,
        }],
    },
    MacroRule {
        kind: RuleKind::Emphasis,
        patterns: &[
            MatchPattern::Command {
                names: &["textbf"],
                starred: false,
                argument: Argument::Required,
                rewrite: strong,
            },
            MatchPattern::Command {
                names: &["emph", "textit"],
                starred: false,
                argument: Argument::Required,
                rewrite: emphasis,
            },
        ],
    },
    MacroRule {
        kind: RuleKind::Lists,
        patterns: &[MatchPattern::ListEnvironments],
    },
    MacroRule {
        kind: RuleKind::Spacing,
        patterns: &[
            MatchPattern::Command {
                names: &["vspace"],
                starred: true,
                argument: Argument::Required,
                rewrite: paragraph_break,
            },
            MatchPattern::Command {
                names: &["\\"],
                starred: false,
                argument: Argument::Optional,
                rewrite: line_break,
            },
        ],
    },
    MacroRule {
        kind: RuleKind::TextWrapper,
        patterns: &[MatchPattern::Command {
            names: &["text"],
            starred: false,
            argument: Argument::Required,
            rewrite: unwrap_argument,
        }],
    },
    MacroRule {
        kind: RuleKind::HorizontalSpace,
        patterns: &[MatchPattern::Command {
            names: &["quad", "qquad"],
            starred: false,
            argument: Argument::Absent,
            rewrite: horizontal_space,
        }],
    },
    MacroRule {
        kind: RuleKind::CollapseBlankLines,
        patterns: &[MatchPattern::BlankLineRuns],
    },
];

/// The rule table in application order
pub fn rule_table() -> &'static [MacroRule] {
    &RULES
}

/// Look up a single rule
pub fn rule(kind: RuleKind) -> &'static MacroRule {
    // RULES is indexed in RuleKind::ALL order
    &RULES[kind as usize]
}

fn rewrite_commands(
    text: &str,
    names: &[&str],
    starred: bool,
    argument: Argument,
    rewrite: Rewrite,
    config: &NormalizeConfig,
) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut scanner = LatexScanner::new(text);

    while let Some(token) = scanner.next() {
        let Some(name) = token.control_name() else {
            continue;
        };
        if !names.contains(&name) {
            continue;
        }

        let mut cursor = token.end;
        let star = starred && text[cursor..].starts_with('*');
        if star {
            cursor += 1;
        }

        let captured = match argument {
            Argument::Absent => None,
            Argument::Required => match group_at(text, cursor) {
                Some((inner, end)) if !inner.is_empty() => {
                    cursor = end;
                    Some(inner)
                }
                _ => continue,
            },
            Argument::Optional => bracket_at(text, cursor).map(|(inner, end)| {
                cursor = end;
                inner
            }),
        };

        // Nested uses of the same command inside the argument
        let nested = captured
            .map(|inner| rewrite_commands(inner, names, starred, argument, rewrite, config));
        let captures = Captures {
            name,
            starred: star,
            argument: nested.as_deref(),
        };

        let replacement = rewrite(&captures, config);
        output.push_str(&text[copied..token.start]);
        push_separated(&mut output, &replacement);
        if ends_with_control_word(&replacement) && starts_with_letter(&text[cursor..]) {
            output.push(' ');
        }
        copied = cursor;
        scanner.seek(cursor);
    }

    output.push_str(&text[copied..]);
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Itemize,
    Enumerate,
}

impl Environment {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "itemize" => Some(Self::Itemize),
            "enumerate" => Some(Self::Enumerate),
            _ => None,
        }
    }
}

fn rewrite_lists(text: &str, config: &NormalizeConfig, lists: &mut ListContext) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut scanner = LatexScanner::new(text);

    while let Some(token) = scanner.next() {
        let TokenKind::ControlWord(word) = token.kind else {
            continue;
        };

        match word {
            "begin" | "end" => {
                let Some((name, end)) = group_at(text, token.end) else {
                    continue;
                };
                let Some(environment) = Environment::from_name(name.trim()) else {
                    continue;
                };
                if word == "begin" {
                    lists.open(environment);
                } else {
                    lists.close(environment);
                }
                output.push_str(&text[copied..token.start]);
                if ends_with_control_word(&output) && starts_with_letter(&text[end..]) {
                    output.push(' ');
                }
                copied = end;
                scanner.seek(end);
            }
            "item" => {
                output.push_str(&text[copied..token.start]);
                start_line(&mut output);
                output.push_str(&lists.next_marker(config.numbering));

                let rest = &text[token.end..];
                let trailing = rest.len() - rest.trim_start().len();
                copied = token.end + trailing;
                scanner.seek(copied);
            }
            _ => {}
        }
    }

    output.push_str(&text[copied..]);
    output
}

/// Append `text`, keeping a preceding control word from absorbing its
/// leading letters (`\quad` + `or` must not become `\quador`)
fn push_separated(output: &mut String, text: &str) {
    if ends_with_control_word(output) && starts_with_letter(text) {
        output.push(' ');
    }
    output.push_str(text);
}

fn starts_with_letter(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Whether `text` ends in an unescaped `\letters` control word
fn ends_with_control_word(text: &str) -> bool {
    let stem = text.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if stem.len() == text.len() {
        return false;
    }
    let backslashes = stem.len() - stem.trim_end_matches('\\').len();
    backslashes % 2 == 1
}

/// Drop trailing indentation and make sure the next write starts a line
fn start_line(output: &mut String) {
    let kept = output.trim_end_matches([' ', '\t']).len();
    output.truncate(kept);
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
}

pub(crate) fn marker(environment: Option<Environment>, number: usize, numbering: Numbering) -> String {
    match environment {
        Some(Environment::Enumerate) => match numbering {
            Numbering::Sequential => format!("{number}. "),
            Numbering::Repeated => "1. ".to_string(),
        },
        Some(Environment::Itemize) | None => "- ".to_string(),
    }
}

/// Collapse whitespace runs containing three or more newlines so that the
/// stretch from their first to their last newline becomes exactly `\n\n`
pub fn collapse_blank_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_whitespace() {
            continue;
        }

        let mut first_newline = (c == '\n').then_some(start);
        let mut last_newline = first_newline;
        let mut newlines = usize::from(c == '\n');
        while let Some(&(i, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            if next == '\n' {
                first_newline.get_or_insert(i);
                last_newline = Some(i);
                newlines += 1;
            }
            chars.next();
        }

        if newlines >= 3 {
            if let (Some(first), Some(last)) = (first_newline, last_newline) {
                output.push_str(&text[copied..first]);
                output.push_str("\n\n");
                copied = last + 1;
            }
        }
    }

    output.push_str(&text[copied..]);
    output
}
