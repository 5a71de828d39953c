// SPDX-License-Identifier: AGPL-3.0-or-later
//! Texmark Pipeline - configured segment, normalize and dispatch runs
//!
//! A pipeline is built once from a [`PipelineConfig`] and then applied to any
//! number of documents:
//! - Input: raw mixed LaTeX/Markdown text
//! - Steps: segment display math, normalize prose, dispatch in reading order
//! - Output: a render plan, renderer outputs, or an HTML body

mod config;
mod html;
mod sample;

pub use config::PipelineConfig;
pub use html::HtmlDocumentRenderer;
pub use sample::SAMPLE_LESSON;

use std::path::Path;
use texmark_core::{
    MarkdownRenderer, MathConfig, MathRenderer, Normalizer, RenderError, RenderPlan,
    RenderedSegment, Segmenter,
};
use thiserror::Error;
use tracing::{debug, debug_span, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline executor
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    segmenter: Segmenter,
    normalizer: Normalizer,
    math: MathConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            segmenter: Segmenter::with_config(config.segment),
            normalizer: Normalizer::with_config(config.normalize),
            math: config.math,
        }
    }

    /// Build a pipeline from a `.toml` or `.json` configuration file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = PipelineConfig::load(path)?;
        debug!(path = %path.display(), "loaded pipeline configuration");
        Ok(Self::new(config))
    }

    /// Segment and normalize `document`
    pub fn plan(&self, document: &str) -> RenderPlan {
        let span = debug_span!("render_document", bytes = document.len());
        let _guard = span.enter();

        let plan = RenderPlan::build(document, &self.segmenter, &self.normalizer, self.math.clone());
        for diagnostic in &plan.diagnostics {
            warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
        }
        debug!(
            math = plan.math_sources().count(),
            prose = plan.markdown().count(),
            "planned document"
        );
        plan
    }

    /// Plan `document` and hand every unit to its renderer in reading order
    pub fn render(
        &self,
        document: &str,
        math_renderer: &dyn MathRenderer,
        markdown_renderer: &dyn MarkdownRenderer,
    ) -> Result<Vec<RenderedSegment>> {
        let plan = self.plan(document);
        Ok(plan.dispatch(math_renderer, markdown_renderer)?)
    }

    /// Plan `document` and lay it out as HTML with the reference renderers
    pub fn render_html(&self, document: &str) -> Result<String> {
        let plan = self.plan(document);
        Ok(HtmlDocumentRenderer::new().render(&plan)?)
    }
}
