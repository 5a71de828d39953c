// SPDX-License-Identifier: AGPL-3.0-or-later
//! Math renderer producing MathJax-ready HTML fragments
//!
//! The payload is not typeset here. The fragment carries the escaped LaTeX
//! (delimiters included) and, optionally, a `text/x-mathjax-config` script so
//! a web view hosting MathJax can typeset it with the configured extensions.

use crate::ast::MathSegment;
use crate::traits::{MathConfig, MathRenderer, Result};

pub struct MathJaxHtmlRenderer {
    include_config: bool,
}

impl MathJaxHtmlRenderer {
    pub fn new() -> Self {
        Self {
            include_config: true,
        }
    }

    /// Omit the configuration script, e.g. when the host page already has one
    pub fn without_config() -> Self {
        Self {
            include_config: false,
        }
    }

    /// The `MathJax.Hub.Config` call for `config`
    pub fn config_script(config: &MathConfig) -> Result<String> {
        let json = serde_json::to_string(config)?;
        Ok(format!(
            "<script type=\"text/x-mathjax-config\">MathJax.Hub.Config({json});</script>"
        ))
    }
}

impl Default for MathJaxHtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MathRenderer for MathJaxHtmlRenderer {
    fn render_math(&self, segment: &MathSegment, config: &MathConfig) -> Result<String> {
        let mut output = format!(
            "<div class=\"texmark-math\" data-index=\"{}\">",
            segment.index
        );
        if self.include_config {
            output.push_str(&Self::config_script(config)?);
        }
        output.push_str(&escape_html(&segment.math_source));
        output.push_str("</div>\n");
        Ok(output)
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(source: &str) -> MathSegment {
        MathSegment {
            index: 4,
            math_source: source.to_string(),
        }
    }

    #[test]
    fn test_fragment_without_config() {
        let html = MathJaxHtmlRenderer::without_config()
            .render_math(&segment(r"\[a < b\]"), &MathConfig::default())
            .unwrap();
        assert_eq!(
            html,
            "<div class=\"texmark-math\" data-index=\"4\">\\[a &lt; b\\]</div>\n"
        );
    }

    #[test]
    fn test_fragment_with_config() {
        let html = MathJaxHtmlRenderer::new()
            .render_math(&segment(r"\[x\]"), &MathConfig::default())
            .unwrap();
        assert!(html.contains("MathJax.Hub.Config({\"messageStyle\":\"none\""));
        assert!(html.contains("AMSmath.js"));
        assert!(html.ends_with("\\[x\\]</div>\n"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
