// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lays dispatched segments out as one HTML body in reading order

use std::io::Write;
use texmark_core::formats::{ComrakMarkdownRenderer, MathJaxHtmlRenderer};
use texmark_core::{RenderPlan, Result};

pub struct HtmlDocumentRenderer {
    math: MathJaxHtmlRenderer,
    markdown: ComrakMarkdownRenderer,
}

impl HtmlDocumentRenderer {
    pub fn new() -> Self {
        Self {
            math: MathJaxHtmlRenderer::without_config(),
            markdown: ComrakMarkdownRenderer::new(),
        }
    }

    /// Render `plan` with the MathJax configuration emitted once up front
    pub fn render(&self, plan: &RenderPlan) -> Result<String> {
        let rendered = plan.dispatch(&self.math, &self.markdown)?;

        let mut output = String::from("<div class=\"texmark-document\">\n");
        output.push_str(&MathJaxHtmlRenderer::config_script(&plan.math)?);
        output.push('\n');
        for segment in rendered {
            output.push_str(&segment.output);
        }
        output.push_str("</div>\n");
        Ok(output)
    }

    pub fn write_to<W: Write>(&self, plan: &RenderPlan, writer: &mut W) -> Result<()> {
        let output = self.render(plan)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

impl Default for HtmlDocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}
