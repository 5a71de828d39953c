// SPDX-License-Identifier: AGPL-3.0-or-later
//! Segment model shared by the segmenter, normalizer and renderers
//!
//! A document is split into an ordered list of segments. Segment order is the
//! only thing that encodes reading order once math and prose are dispatched to
//! different renderers, so every segment carries its zero-based `index`.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Span information for source mapping
///
/// `start`/`end` are byte offsets into the document; `line` and `column` are
/// 1-based and locate `start`. Columns count grapheme clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

/// Byte offsets of line starts, for turning offsets into line/column pairs
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    /// Build a span for `start..end`
    pub fn span(&self, start: usize, end: usize) -> Span {
        let line = match self.line_starts.binary_search(&start) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..start].graphemes(true).count();

        Span {
            start,
            end,
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }
}

/// Classification of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Display-math block, delimiters included
    Math,
    /// Everything else: LaTeX macros and/or literal Markdown
    Prose,
}

impl SegmentKind {
    /// Short display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Prose => "prose",
        }
    }
}

/// A maximal contiguous span of the document classified as math or prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub index: usize,
    pub raw: String,
    pub span: Span,
}

impl Segment {
    pub fn is_math(&self) -> bool {
        self.kind == SegmentKind::Math
    }

    pub fn is_prose(&self) -> bool {
        self.kind == SegmentKind::Prose
    }
}

/// A math segment handed through to the math renderer untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSegment {
    pub index: usize,
    pub math_source: String,
}

/// Normalizer output for one prose segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSegment {
    pub index: usize,
    pub markdown: String,
}

/// One entry of the dispatch list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderUnit {
    Markdown(NormalizedSegment),
    Math(MathSegment),
}

impl RenderUnit {
    pub fn index(&self) -> usize {
        match self {
            RenderUnit::Markdown(segment) => segment.index,
            RenderUnit::Math(segment) => segment.index,
        }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            RenderUnit::Markdown(_) => SegmentKind::Prose,
            RenderUnit::Math(_) => SegmentKind::Math,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A display-math open marker with no close marker before end of input
    UnterminatedMath,
}

/// Non-fatal report surfaced alongside a best-effort result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            span,
        }
    }
}

/// Segmenter output: the segment list plus any diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Segmentation {
    /// Concatenation of every segment's raw text in index order
    pub fn reconstruct(&self) -> String {
        self.segments.iter().map(|s| s.raw.as_str()).collect()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn math_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_math()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_first_line() {
        let index = LineIndex::new("abc\ndef");
        let span = index.span(1, 2);
        assert_eq!((span.line, span.column), (1, 2));
    }

    #[test]
    fn test_line_index_after_newline() {
        let index = LineIndex::new("abc\ndef\n");
        assert_eq!(index.span(4, 5).line, 2);
        assert_eq!(index.span(4, 5).column, 1);
        assert_eq!(index.span(8, 8).line, 3);
    }

    #[test]
    fn test_line_index_counts_graphemes() {
        // "é" written as e + combining acute is one column
        let source = "e\u{301}x";
        let index = LineIndex::new(source);
        assert_eq!(index.span(3, 4).column, 2);
    }

    #[test]
    fn test_render_unit_serializes_with_tag() {
        let unit = RenderUnit::Math(MathSegment {
            index: 1,
            math_source: r"\[x\]".to_string(),
        });
        let json = serde_json::to_value(&unit).expect("serialize");
        assert_eq!(json["type"], "math");
        assert_eq!(json["index"], 1);
    }
}
