// SPDX-License-Identifier: AGPL-3.0-or-later
//! Display-math segmenter
//!
//! Forward scanner that partitions a document into alternating prose and math
//! segments. The output always starts and ends with a prose segment (possibly
//! empty), so an input with `n` math blocks yields `2n + 1` segments, and the
//! concatenation of all segments is the input.
//!
//! Backslash pairs are consumed as a unit, which keeps `\\[2pt]` (a line break
//! with a length) from opening a block and `\\` from eating half of a `\]`.

use crate::ast::{
    Diagnostic, DiagnosticKind, LineIndex, Segment, SegmentKind, Segmentation,
};
use crate::traits::{DelimiterPair, SegmentConfig};
use tracing::{trace, warn};

#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentConfig,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut config: SegmentConfig) -> Self {
        // Longest open marker first so `$$` beats `$`
        config
            .delimiters
            .retain(|pair| !pair.open.is_empty() && !pair.close.is_empty());
        config
            .delimiters
            .sort_by(|a, b| b.open.len().cmp(&a.open.len()));
        Self { config }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Split `document` into segments
    pub fn segment(&self, document: &str) -> Segmentation {
        let lines = LineIndex::new(document);
        let mut builder = Builder::new(document, &lines);

        let mut pos = 0;
        while pos < document.len() {
            let rest = &document[pos..];

            if let Some(pair) = self.open_at(rest) {
                let body = pos + pair.open.len();
                match find_close(document, body, &pair.close) {
                    Some(end) => {
                        builder.push_math(pos, end);
                        pos = end;
                    }
                    None => {
                        let span = lines.span(pos, body);
                        warn!(
                            line = span.line,
                            column = span.column,
                            marker = %pair.open,
                            "unterminated display math, keeping as prose"
                        );
                        builder.diagnostics.push(Diagnostic::warning(
                            DiagnosticKind::UnterminatedMath,
                            format!(
                                "`{}` at line {}, column {} has no closing `{}`",
                                pair.open, span.line, span.column, pair.close
                            ),
                            span,
                        ));
                        pos = body;
                    }
                }
                continue;
            }

            pos += escape_len(rest);
        }

        builder.finish()
    }

    fn open_at(&self, rest: &str) -> Option<&DelimiterPair> {
        self.config
            .delimiters
            .iter()
            .find(|pair| rest.starts_with(pair.open.as_str()))
    }
}

/// Convenience: segment with the default `\[ \]` delimiters
pub fn segment(document: &str) -> Segmentation {
    Segmenter::new().segment(document)
}

/// Offset just past the first `close` at or after `from`
fn find_close(document: &str, from: usize, close: &str) -> Option<usize> {
    let mut pos = from;
    while pos < document.len() {
        let rest = &document[pos..];
        if rest.starts_with(close) {
            return Some(pos + close.len());
        }
        pos += escape_len(rest);
    }
    None
}

/// Length of the next scanning unit: a backslash pair or a single char
fn escape_len(rest: &str) -> usize {
    let mut chars = rest.chars();
    match chars.next() {
        Some('\\') => 1 + chars.next().map_or(0, char::len_utf8),
        Some(c) => c.len_utf8(),
        None => 0,
    }
}

struct Builder<'a> {
    document: &'a str,
    lines: &'a LineIndex<'a>,
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
    prose_start: usize,
}

impl<'a> Builder<'a> {
    fn new(document: &'a str, lines: &'a LineIndex<'a>) -> Self {
        Self {
            document,
            lines,
            segments: Vec::new(),
            diagnostics: Vec::new(),
            prose_start: 0,
        }
    }

    fn push(&mut self, kind: SegmentKind, start: usize, end: usize) {
        let index = self.segments.len();
        trace!(index, kind = kind.label(), start, end, "segment");
        self.segments.push(Segment {
            kind,
            index,
            raw: self.document[start..end].to_string(),
            span: self.lines.span(start, end),
        });
    }

    fn push_math(&mut self, start: usize, end: usize) {
        self.push(SegmentKind::Prose, self.prose_start, start);
        self.push(SegmentKind::Math, start, end);
        self.prose_start = end;
    }

    fn finish(mut self) -> Segmentation {
        self.push(SegmentKind::Prose, self.prose_start, self.document.len());
        Segmentation {
            segments: self.segments,
            diagnostics: self.diagnostics,
        }
    }
}
