//! Navigator configuration
//!
//! Every section has defaults, so partial documents are fine. Loaded
//! values are sanitized before use: anything that would break spacing or
//! zoom guarantees is pulled back into range.

use serde::{Deserialize, Serialize};

use crate::error::NavResult;
use crate::interaction::InteractionConfig;
use crate::layout::LayoutConfig;
use crate::viewport::ViewportConfig;

/// Settings for every navigator component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub interaction: InteractionConfig,
}

impl NavigatorConfig {
    /// Load configuration from JSON
    pub fn from_json(json: &str) -> NavResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load configuration from YAML
    pub fn from_yaml(yaml: &str) -> NavResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    pub fn sanitized(self) -> Self {
        Self {
            layout: self.layout.sanitized(),
            viewport: self.viewport.sanitized(),
            interaction: self.interaction.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;

    #[test]
    fn empty_documents_give_defaults() {
        assert_eq!(NavigatorConfig::from_json("{}").unwrap(), NavigatorConfig::default());
        assert_eq!(NavigatorConfig::from_yaml("{}").unwrap(), NavigatorConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = NavigatorConfig::from_json(
            r#"{ "layout": { "iterations": 180 }, "viewport": { "margin": 50.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.layout.iterations, 180);
        assert_eq!(config.layout.repulsion, 5000.0);
        assert_eq!(config.viewport.margin, 50.0);
        assert_eq!(config.viewport.virtualization_threshold, 100);
        assert_eq!(config.interaction.wheel_step, 1.15);
    }

    #[test]
    fn yaml_values_are_sanitized() {
        let yaml = "
layout:
  iterations: 10
  collision:
    min_distance: 20.0
interaction:
  wheel_step: 0.5
";
        let config = NavigatorConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.layout.iterations, 100);
        assert_eq!(config.layout.collision.min_distance, 80.0);
        assert_eq!(config.layout.collision.max_iterations, 100);
        assert_eq!(config.interaction.wheel_step, 1.15);
    }

    #[test]
    fn invalid_documents_are_parse_errors() {
        assert!(matches!(
            NavigatorConfig::from_json("{ \"layout\": 3 }"),
            Err(NavError::Parse(_))
        ));
        assert!(matches!(
            NavigatorConfig::from_yaml("layout: [1, 2"),
            Err(NavError::Parse(_))
        ));
    }
}
