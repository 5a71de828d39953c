// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pipeline configuration (TOML or JSON)
//!
//! ```toml
//! [segment]
//! delimiters = [{ open = '\[', close = '\]' }, { open = '$$', close = '$$' }]
//!
//! [normalize]
//! numbering = "repeated"
//! disabled_rules = ["horizontal_space"]
//!
//! [math.tex2jax]
//! processEscapes = false
//! ```

use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use texmark_core::{MathConfig, NormalizeConfig, SegmentConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub segment: SegmentConfig,
    pub normalize: NormalizeConfig,
    pub math: MathConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, picking the syntax by extension (`.toml` or `.json`)
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&input),
            Some("toml") | None => Self::from_toml_str(&input),
            Some(other) => Err(PipelineError::InvalidConfig(format!(
                "unsupported config extension: .{other}"
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment.delimiters.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one display-math delimiter pair is required".to_string(),
            ));
        }

        let mut opens = HashSet::new();
        for pair in &self.segment.delimiters {
            if pair.open.is_empty() || pair.close.is_empty() {
                return Err(PipelineError::InvalidConfig(
                    "delimiter markers must not be empty".to_string(),
                ));
            }
            if !opens.insert(pair.open.as_str()) {
                return Err(PipelineError::InvalidConfig(format!(
                    "duplicate open delimiter `{}`",
                    pair.open
                )));
            }
        }

        if !(1..=6).contains(&self.normalize.heading_level) {
            return Err(PipelineError::InvalidConfig(format!(
                "heading level {} is outside 1-6",
                self.normalize.heading_level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use texmark_core::{DelimiterPair, Numbering, RuleKind};

    const TOML: &str = r#"
[segment]
delimiters = [{ open = '\[', close = '\]' }, { open = '$$', close = '$$' }]

[normalize]
numbering = "repeated"
disabled_rules = ["horizontal_space"]

[math.tex2jax]
processEscapes = false
"#;

    #[test]
    fn test_from_toml() {
        let config = PipelineConfig::from_toml_str(TOML).unwrap();
        assert_eq!(
            config.segment.delimiters,
            vec![DelimiterPair::brackets(), DelimiterPair::dollars()]
        );
        assert_eq!(config.normalize.numbering, Numbering::Repeated);
        assert_eq!(config.normalize.disabled_rules, vec![RuleKind::HorizontalSpace]);
        assert_eq!(config.normalize.quad_width, 4);
        assert!(!config.math.tex2jax.process_escapes);
        assert_eq!(config.math.message_style, "none");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_from_json() {
        let config = PipelineConfig::from_json_str(
            r#"{"normalize": {"heading_level": 3}, "math": {"messageStyle": "simple"}}"#,
        )
        .unwrap();
        assert_eq!(config.normalize.heading_level, 3);
        assert_eq!(config.math.message_style, "simple");
        assert_eq!(config.segment, SegmentConfig::default());
    }

    #[test]
    fn test_invalid_heading_level() {
        let err = PipelineConfig::from_toml_str("[normalize]\nheading_level = 7\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_delimiters() {
        let input = r#"
[segment]
delimiters = [{ open = "$$", close = "$$" }, { open = "$$", close = "$$" }]
"#;
        let err = PipelineConfig::from_toml_str(input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pipeline configuration: duplicate open delimiter `$$`"
        );
    }

    #[test]
    fn test_empty_delimiter_list() {
        let err = PipelineConfig::from_toml_str("[segment]\ndelimiters = []\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PipelineConfig::from_toml_str("[normalize\n").unwrap_err();
        assert!(matches!(err, PipelineError::Toml(_)));
    }

    #[test]
    fn test_unknown_rule_name() {
        let err = PipelineConfig::from_toml_str("[normalize]\ndisabled_rules = [\"footnotes\"]\n")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Toml(_)));
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("texmark.toml");
        std::fs::File::create(&toml_path)
            .unwrap()
            .write_all(TOML.as_bytes())
            .unwrap();
        let config = PipelineConfig::load(&toml_path).unwrap();
        assert_eq!(config.segment.delimiters.len(), 2);

        let json_path = dir.path().join("texmark.json");
        std::fs::write(&json_path, r#"{"normalize": {"quad_width": 2}}"#).unwrap();
        assert_eq!(PipelineConfig::load(&json_path).unwrap().normalize.quad_width, 2);

        let yaml_path = dir.path().join("texmark.yaml");
        std::fs::write(&yaml_path, "normalize: {}").unwrap();
        assert!(matches!(
            PipelineConfig::load(&yaml_path),
            Err(PipelineError::InvalidConfig(_))
        ));

        assert!(matches!(
            PipelineConfig::load(&dir.path().join("missing.toml")),
            Err(PipelineError::Io(_))
        ));
    }
}
