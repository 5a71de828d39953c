// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reference renderers for each segment kind

pub mod markdown;
pub mod mathjax;

pub use markdown::ComrakMarkdownRenderer;
pub use mathjax::{escape_html, MathJaxHtmlRenderer};
