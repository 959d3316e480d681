use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PaintResult;

const SUPPORTED_SIZES: [f32; 6] = [60.0, 40.0, 30.0, 20.0, 10.0, 3.0];

/// Sizes and option presets offered for one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCard {
    pub supported_sizes: Vec<f32>,
    pub default_size_index: usize,
    /// Option the presets apply to; `None` for tools without one
    pub option_key: Option<String>,
    pub option_values: Vec<f32>,
    pub default_option_index: Option<usize>,
}

impl Default for ToolCard {
    fn default() -> Self {
        Self {
            supported_sizes: SUPPORTED_SIZES.to_vec(),
            default_size_index: 4,
            option_key: None,
            option_values: Vec::new(),
            default_option_index: None,
        }
    }
}

impl ToolCard {
    fn with_option(default_size_index: usize, key: &str, values: &[f32], default_option_index: usize) -> Self {
        Self {
            default_size_index,
            option_key: Some(key.to_owned()),
            option_values: values.to_vec(),
            default_option_index: Some(default_option_index),
            ..Default::default()
        }
    }

    pub fn size(&self, index: usize) -> Option<f32> {
        self.supported_sizes.get(index).copied()
    }

    pub fn default_size(&self) -> Option<f32> {
        self.size(self.default_size_index)
    }

    /// Option preset at `index`; index 0 is a valid preset
    pub fn option_value(&self, index: usize) -> Option<f32> {
        self.option_values.get(index).copied()
    }

    /// The preset option key and value, when the card has both
    pub fn default_option(&self) -> Option<(&str, f32)> {
        let key = self.option_key.as_deref()?;
        let value = self.option_value(self.default_option_index?)?;
        Some((key, value))
    }
}

/// Startup configuration of a paint session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub history_depth: usize,
    pub default_tool: String,
    pub default_color: String,
    /// PNG tile for the crayon; a procedural grain is used when absent
    pub crayon_texture: Option<PathBuf>,
    pub tools: BTreeMap<String, ToolCard>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        let tools = [
            ("marker", ToolCard::with_option(4, "opacity", &[1.0, 0.85, 0.7, 0.5, 0.35, 0.2], 1)),
            ("brush", ToolCard::with_option(3, "fade", &[0.0, 1000.0, 700.0, 400.0, 200.0, 100.0], 0)),
            ("neon", ToolCard::with_option(3, "glow", &[70.0, 55.0, 40.0, 25.0, 10.0, 0.0], 4)),
            ("pipe", ToolCard::with_option(3, "height", &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0], 4)),
            ("crayon", ToolCard::with_option(4, "density", &[2.0, 1.75, 1.5, 1.25, 1.0, 0.75], 1)),
            ("eraser", ToolCard::default()),
        ]
        .into_iter()
        .map(|(name, card)| (name.to_owned(), card))
        .collect();

        Self {
            canvas_width: 1024,
            canvas_height: 768,
            history_depth: crate::surface::DEFAULT_DEPTH,
            default_tool: "marker".to_owned(),
            default_color: "rgba(0,0,0,1)".to_owned(),
            crayon_texture: None,
            tools,
        }
    }
}

impl PaintConfig {
    pub fn from_json(json: &str) -> PaintResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> PaintResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> PaintResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tool_card(&self, name: &str) -> Option<&ToolCard> {
        self.tools.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cards() {
        let config = PaintConfig::default();
        let marker = config.tool_card("marker").unwrap();
        assert_eq!(marker.default_size(), Some(10.0));
        assert_eq!(marker.default_option(), Some(("opacity", 0.85)));

        let brush = config.tool_card("brush").unwrap();
        assert_eq!(brush.default_option(), Some(("fade", 0.0)));

        let eraser = config.tool_card("eraser").unwrap();
        assert_eq!(eraser.default_option(), None);
        assert_eq!(eraser.option_value(0), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PaintConfig::from_json(r#"{ "canvas_width": 320, "history_depth": 3 }"#).unwrap();
        assert_eq!(config.canvas_width, 320);
        assert_eq!(config.canvas_height, 768);
        assert_eq!(config.history_depth, 3);
        assert_eq!(config.tools.len(), 6);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PaintConfig::default();
        let parsed = PaintConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            PaintConfig::from_json("{ nope"),
            Err(crate::error::PaintError::Config(_))
        ));
    }
}
