// SPDX-License-Identifier: AGPL-3.0-or-later
//! Texmark Core - mixed LaTeX/Markdown segmentation and normalization
//!
//! This crate provides:
//! - A segmenter that splits a document into display-math and prose segments
//! - A normalizer that rewrites known LaTeX macros in prose into Markdown
//! - Renderer traits plus comrak and MathJax reference renderers
//! - C FFI exports for mobile hosts

pub mod ast;
pub mod dispatch;
pub mod formats;
pub mod normalize;
pub mod scanner;
pub mod segment;
pub mod traits;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use ast::{
    Diagnostic, DiagnosticKind, MathSegment, NormalizedSegment, RenderUnit, Segment, SegmentKind,
    Segmentation, Severity, Span,
};
pub use dispatch::{render_plan, RenderPlan, RenderedSegment};
pub use normalize::{normalize, ListContext, Normalizer, RuleKind};
pub use segment::{segment, Segmenter};
pub use traits::{
    DelimiterPair, MarkdownRenderer, MathConfig, MathRenderer, NormalizeConfig, Numbering,
    RenderError, Result, SegmentConfig,
};
