// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration, error type and renderer traits

use crate::ast::{MathSegment, NormalizedSegment, SegmentKind};
use crate::normalize::RuleKind;
use serde::{Deserialize, Serialize};

/// Error type for renderer dispatch
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{} renderer failed on segment {index}: {message}", .kind.label())]
    Renderer {
        kind: SegmentKind,
        index: usize,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// An open/close marker pair for display math
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub open: String,
    pub close: String,
}

impl DelimiterPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `\[` ... `\]`
    pub fn brackets() -> Self {
        Self::new(r"\[", r"\]")
    }

    /// `$$` ... `$$`
    pub fn dollars() -> Self {
        Self::new("$$", "$$")
    }
}

/// Configuration for segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Display-math delimiters; the longest matching open marker wins
    pub delimiters: Vec<DelimiterPair>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            delimiters: vec![DelimiterPair::brackets()],
        }
    }
}

/// Marker style for `\item` inside `enumerate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Numbering {
    /// `1.`, `2.`, `3.`
    #[default]
    Sequential,
    /// `1.` for every item; the Markdown renderer numbers them
    Repeated,
}

/// Configuration for normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub numbering: Numbering,
    /// Spaces emitted for `\quad` (`\qquad` gets twice as many)
    pub quad_width: usize,
    /// Markdown heading level for `\section`
    pub heading_level: u8,
    /// Rules skipped during normalization
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled_rules: Vec<RuleKind>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            numbering: Numbering::Sequential,
            quad_width: 4,
            heading_level: 2,
            disabled_rules: Vec::new(),
        }
    }
}

impl NormalizeConfig {
    pub fn is_enabled(&self, rule: RuleKind) -> bool {
        !self.disabled_rules.contains(&rule)
    }
}

/// Delimiter settings for the MathJax tex2jax preprocessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tex2JaxConfig {
    pub inline_math: Vec<(String, String)>,
    pub display_math: Vec<(String, String)>,
    pub process_escapes: bool,
}

impl Default for Tex2JaxConfig {
    fn default() -> Self {
        let pair = |open: &str, close: &str| (open.to_string(), close.to_string());
        Self {
            inline_math: vec![pair("$", "$"), pair(r"\(", r"\)")],
            display_math: vec![pair("$$", "$$"), pair(r"\[", r"\]")],
            process_escapes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexConfig {
    pub extensions: Vec<String>,
}

impl Default for TexConfig {
    fn default() -> Self {
        Self {
            extensions: ["AMSmath.js", "AMSsymbols.js", "noErrors.js", "noUndefined.js"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Typesetting options passed through to the math renderer
///
/// Serializes to the MathJax configuration object shape. The core never
/// interprets these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MathConfig {
    pub message_style: String,
    pub extensions: Vec<String>,
    pub jax: Vec<String>,
    #[serde(rename = "tex2jax")]
    pub tex2jax: Tex2JaxConfig,
    #[serde(rename = "TeX")]
    pub tex: TexConfig,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            message_style: "none".to_string(),
            extensions: vec!["tex2jax.js".to_string()],
            jax: vec!["input/TeX".to_string(), "output/HTML-CSS".to_string()],
            tex2jax: Tex2JaxConfig::default(),
            tex: TexConfig::default(),
        }
    }
}

/// Math renderer: consumes a raw delimited LaTeX payload
pub trait MathRenderer: Send + Sync {
    fn render_math(&self, segment: &MathSegment, config: &MathConfig) -> Result<String>;
}

/// Markdown renderer: consumes normalized Markdown text
pub trait MarkdownRenderer: Send + Sync {
    fn render_markdown(&self, segment: &NormalizedSegment) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_config_json_shape() {
        let json = serde_json::to_value(MathConfig::default()).unwrap();
        assert_eq!(json["messageStyle"], "none");
        assert_eq!(json["jax"][0], "input/TeX");
        assert_eq!(json["tex2jax"]["inlineMath"][1][0], r"\(");
        assert_eq!(json["tex2jax"]["displayMath"][1][1], r"\]");
        assert_eq!(json["tex2jax"]["processEscapes"], true);
        assert_eq!(json["TeX"]["extensions"][3], "noUndefined.js");
    }

    #[test]
    fn test_normalize_config_partial_json() {
        let config: NormalizeConfig =
            serde_json::from_str(r#"{"numbering": "repeated"}"#).unwrap();
        assert_eq!(config.numbering, Numbering::Repeated);
        assert_eq!(config.quad_width, 4);
        assert!(config.is_enabled(RuleKind::Lists));
    }

    #[test]
    fn test_render_error_message() {
        let err = RenderError::Renderer {
            kind: SegmentKind::Math,
            index: 3,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "math renderer failed on segment 3: boom");
    }
}
