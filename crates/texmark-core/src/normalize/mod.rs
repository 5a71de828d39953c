// SPDX-License-Identifier: AGPL-3.0-or-later
//! Prose normalizer: rewrites a fixed set of LaTeX macros into Markdown
//!
//! Normalization is a fold of the rule table over the segment text. Anything
//! the table does not recognize, including malformed macro arguments, is left
//! verbatim so the reader still sees the source.

mod rules;

pub use rules::{
    collapse_blank_lines, rule, rule_table, Argument, Captures, MacroRule, MatchPattern,
    Rewrite, RuleKind,
};

use crate::ast::{MathSegment, NormalizedSegment, RenderUnit, Segment, SegmentKind};
use crate::traits::{NormalizeConfig, Numbering};
use rules::Environment;
use tracing::trace;

/// Open list environments, innermost last, with their item counters
///
/// Carried across the prose segments of one document so that an `\item`
/// following a display-math block still knows which list it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContext {
    frames: Vec<(Environment, usize)>,
}

impl ListContext {
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn open(&mut self, environment: Environment) {
        self.frames.push((environment, 0));
    }

    /// Close the nearest open `environment`, along with anything opened
    /// inside it and left unclosed. Unmatched ends are ignored.
    pub(crate) fn close(&mut self, environment: Environment) {
        if let Some(at) = self.frames.iter().rposition(|(e, _)| *e == environment) {
            self.frames.truncate(at);
        }
    }

    pub(crate) fn next_marker(&mut self, numbering: Numbering) -> String {
        match self.frames.last_mut() {
            Some((environment, count)) => {
                *count += 1;
                rules::marker(Some(*environment), *count, numbering)
            }
            None => rules::marker(None, 0, numbering),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Normalize one prose segment on its own
    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_with(raw, &mut ListContext::default())
    }

    /// Normalize one prose segment, continuing from `lists`
    pub fn normalize_with(&self, raw: &str, lists: &mut ListContext) -> String {
        rule_table()
            .iter()
            .filter(|rule| self.config.is_enabled(rule.kind))
            .fold(raw.to_string(), |text, rule| {
                let next = rule.apply(&text, &self.config, lists);
                if next != text {
                    trace!(rule = ?rule.kind, "rule rewrote text");
                }
                next
            })
    }

    /// Turn a segment list into dispatch units, threading list state through
    /// the prose segments in index order
    pub fn normalize_document(&self, segments: &[Segment]) -> Vec<RenderUnit> {
        let mut lists = ListContext::default();
        segments
            .iter()
            .map(|segment| match segment.kind {
                SegmentKind::Math => RenderUnit::Math(MathSegment {
                    index: segment.index,
                    math_source: segment.raw.clone(),
                }),
                SegmentKind::Prose => RenderUnit::Markdown(NormalizedSegment {
                    index: segment.index,
                    markdown: self.normalize_with(&segment.raw, &mut lists),
                }),
            })
            .collect()
    }
}

/// Convenience: normalize with the default configuration
pub fn normalize(raw: &str) -> String {
    Normalizer::new().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section() {
        assert_eq!(normalize(r"\section*{Intro}"), "## Intro");
    }

    #[test]
    fn test_bold() {
        assert_eq!(normalize(r"\textbf{bold}"), "**bold**");
    }

    #[test]
    fn test_itemize() {
        assert_eq!(
            normalize(r"\begin{itemize}\item A\item B\end{itemize}"),
            "- A\n- B"
        );
    }

    #[test]
    fn test_enumerate() {
        assert_eq!(
            normalize(r"\begin{enumerate}\item X\item Y\end{enumerate}"),
            "1. X\n2. Y"
        );
    }

    #[test]
    fn test_bold_inside_section() {
        assert_eq!(normalize(r"\section{A \textbf{b}}"), "## A **b**");
    }

    #[test]
    fn test_markdown_untouched() {
        let text = "## Already\n\n- item\n\n**bold** and `code`";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_unknown_macro_passes_through() {
        assert_eq!(normalize(r"see \cite{knuth} and \ref{x}"), r"see \cite{knuth} and \ref{x}");
    }

    #[test]
    fn test_spacing_then_collapse() {
        let text = "\\section*{Introduction}\n\n\\vspace{1em}\n\nWelcome";
        assert_eq!(normalize(text), "## Introduction\n\nWelcome");
    }

    #[test]
    fn test_quad_and_text() {
        // `\quad` keeps its trailing space separator, as LaTeX would read it
        let gap = " ".repeat(5);
        assert_eq!(normalize(r"a\quad\text{or}\quad b"), format!("a{gap}or{gap}b"));
    }

    #[test]
    fn test_disabled_rule() {
        let normalizer = Normalizer::with_config(NormalizeConfig {
            disabled_rules: vec![RuleKind::Emphasis],
            ..NormalizeConfig::default()
        });
        assert_eq!(normalizer.normalize(r"\section{A} \textbf{b}"), r"## A \textbf{b}");
    }

    #[test]
    fn test_list_context_survives_math() {
        let doc = "\\begin{enumerate}\n\\item First\n\\[x=1\\]\n\\item Second\n\\end{enumerate}";
        let units = Normalizer::new().normalize_document(&segment(doc).segments);
        let markdown: Vec<&str> = units
            .iter()
            .filter_map(|u| match u {
                RenderUnit::Markdown(s) => Some(s.markdown.as_str()),
                RenderUnit::Math(_) => None,
            })
            .collect();
        assert_eq!(markdown, vec!["\n1. First\n", "\n2. Second\n"]);
    }

    #[test]
    fn test_normalize_document_keeps_math_verbatim() {
        let units = Normalizer::new().normalize_document(&segment(r"a\[\text{x}\quad\]b").segments);
        assert_eq!(units.len(), 3);
        assert_eq!(
            units[1],
            RenderUnit::Math(MathSegment {
                index: 1,
                math_source: r"\[\text{x}\quad\]".to_string(),
            })
        );
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(unit.index(), i);
        }
    }

    #[test]
    fn test_list_context_close_unwinds() {
        let mut lists = ListContext::default();
        lists.open(Environment::Enumerate);
        lists.open(Environment::Itemize);
        lists.close(Environment::Enumerate);
        assert!(lists.is_empty());
        lists.close(Environment::Itemize);
        assert_eq!(lists.depth(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn prose_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just(r"\section*{".to_string()),
                Just(r"\textbf{".to_string()),
                Just(r"\begin{itemize}".to_string()),
                Just(r"\end{enumerate}".to_string()),
                Just(r"\item ".to_string()),
                Just(r"\\".to_string()),
                Just(r"\quad".to_string()),
                Just("}".to_string()),
                Just("\n\n\n".to_string()),
                "[a-z ]{0,6}",
            ],
            0..20,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        // Property: output never holds a whitespace run with three newlines
        #[test]
        fn prop_normalized_blank_lines_bounded(text in prose_strategy()) {
            let out = normalize(&text);
            for run in out.split(|c: char| !c.is_whitespace()) {
                prop_assert!(run.matches('\n').count() <= 2);
            }
        }

        // Property: plain words survive normalization
        #[test]
        fn prop_plain_text_unchanged(text in "[a-zA-Z0-9 .,*#-]{0,60}") {
            prop_assert_eq!(normalize(&text), text);
        }
    }
}
