// SPDX-License-Identifier: AGPL-3.0-or-later
//! Render plan and dual-renderer dispatch
//!
//! The plan is the full hand-off to the UI shell: normalized prose, raw math
//! payloads, the opaque math configuration and any diagnostics. Dispatch walks
//! the units in ascending index order so outputs can be laid out as read.

use crate::ast::{Diagnostic, RenderUnit, SegmentKind};
use crate::normalize::Normalizer;
use crate::segment::Segmenter;
use crate::traits::{MarkdownRenderer, MathConfig, MathRenderer, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub units: Vec<RenderUnit>,
    pub math: MathConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Output of one renderer call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSegment {
    pub index: usize,
    pub kind: SegmentKind,
    pub output: String,
}

impl RenderPlan {
    /// Segment and normalize `document`
    pub fn build(
        document: &str,
        segmenter: &Segmenter,
        normalizer: &Normalizer,
        math: MathConfig,
    ) -> Self {
        let segmentation = segmenter.segment(document);
        let units = normalizer.normalize_document(&segmentation.segments);
        debug!(
            units = units.len(),
            diagnostics = segmentation.diagnostics.len(),
            "built render plan"
        );
        Self {
            units,
            math,
            diagnostics: segmentation.diagnostics,
        }
    }

    /// Invoke the renderers in index order, stopping at the first failure
    pub fn dispatch(
        &self,
        math_renderer: &dyn MathRenderer,
        markdown_renderer: &dyn MarkdownRenderer,
    ) -> Result<Vec<RenderedSegment>> {
        let mut units: Vec<&RenderUnit> = self.units.iter().collect();
        units.sort_by_key(|unit| unit.index());

        units
            .into_iter()
            .map(|unit| -> Result<RenderedSegment> {
                let output = match unit {
                    RenderUnit::Math(segment) => math_renderer.render_math(segment, &self.math)?,
                    RenderUnit::Markdown(segment) => markdown_renderer.render_markdown(segment)?,
                };
                Ok(RenderedSegment {
                    index: unit.index(),
                    kind: unit.kind(),
                    output,
                })
            })
            .collect()
    }

    /// Markdown text of every prose unit, in order
    pub fn markdown(&self) -> impl Iterator<Item = &str> {
        self.units.iter().filter_map(|unit| match unit {
            RenderUnit::Markdown(segment) => Some(segment.markdown.as_str()),
            RenderUnit::Math(_) => None,
        })
    }

    /// Raw payload of every math unit, in order
    pub fn math_sources(&self) -> impl Iterator<Item = &str> {
        self.units.iter().filter_map(|unit| match unit {
            RenderUnit::Math(segment) => Some(segment.math_source.as_str()),
            RenderUnit::Markdown(_) => None,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build a plan with default segmenter, normalizer and math configuration
pub fn render_plan(document: &str) -> RenderPlan {
    RenderPlan::build(
        document,
        &Segmenter::new(),
        &Normalizer::new(),
        MathConfig::default(),
    )
}
