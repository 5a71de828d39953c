// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown renderer using comrak

use crate::ast::NormalizedSegment;
use crate::traits::{MarkdownRenderer, Result};
use comrak::{markdown_to_html, Options};

/// Renders normalized Markdown to HTML (GFM-compatible)
pub struct ComrakMarkdownRenderer;

impl ComrakMarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn comrak_options() -> Options<'static> {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options
    }
}

impl Default for ComrakMarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakMarkdownRenderer {
    fn render_markdown(&self, segment: &NormalizedSegment) -> Result<String> {
        Ok(markdown_to_html(&segment.markdown, &Self::comrak_options()))
    }
}
