use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spacing constants for the family-tree layout, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between a wrapper and its child wrappers.
    pub spacing_x: f64,
    /// Height of one subtree unit.
    pub spacing_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub heart_offset_x: f64,
    pub heart_offset_y: f64,
    pub spouse_offset_y: f64,
    /// Vertical step between consecutive spouse rows of one anchor.
    pub multi_spouse_gap: f64,
    /// Self-height added for every spouse beyond the first, in subtree units.
    pub extra_spouse_height: f64,
    pub export_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_x: 250.0,
            spacing_y: 250.0,
            origin_x: 200.0,
            origin_y: 200.0,
            heart_offset_x: 64.0,
            heart_offset_y: 90.0,
            spouse_offset_y: 135.0,
            multi_spouse_gap: 150.0,
            extra_spouse_height: 0.6,
            export_padding: 5.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let fields = [
            ("spacingX", self.spacing_x),
            ("spacingY", self.spacing_y),
            ("originX", self.origin_x),
            ("originY", self.origin_y),
            ("heartOffsetX", self.heart_offset_x),
            ("heartOffsetY", self.heart_offset_y),
            ("spouseOffsetY", self.spouse_offset_y),
            ("multiSpouseGap", self.multi_spouse_gap),
            ("extraSpouseHeight", self.extra_spouse_height),
            ("exportPadding", self.export_padding),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("{name} must be a finite number, got {value}");
            }
        }
        let non_negative = [
            ("spacingX", self.spacing_x),
            ("spacingY", self.spacing_y),
            ("multiSpouseGap", self.multi_spouse_gap),
            ("extraSpouseHeight", self.extra_spouse_height),
            ("exportPadding", self.export_padding),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                bail!("{name} must not be negative, got {value}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    spacing_x: Option<f64>,
    spacing_y: Option<f64>,
    origin_x: Option<f64>,
    origin_y: Option<f64>,
    heart_offset_x: Option<f64>,
    heart_offset_y: Option<f64>,
    spouse_offset_y: Option<f64>,
    multi_spouse_gap: Option<f64>,
    extra_spouse_height: Option<f64>,
    export_padding: Option<f64>,
}

impl ConfigFile {
    fn merge_into(self, config: &mut LayoutConfig) {
        if let Some(v) = self.spacing_x {
            config.spacing_x = v;
        }
        if let Some(v) = self.spacing_y {
            config.spacing_y = v;
        }
        if let Some(v) = self.origin_x {
            config.origin_x = v;
        }
        if let Some(v) = self.origin_y {
            config.origin_y = v;
        }
        if let Some(v) = self.heart_offset_x {
            config.heart_offset_x = v;
        }
        if let Some(v) = self.heart_offset_y {
            config.heart_offset_y = v;
        }
        if let Some(v) = self.spouse_offset_y {
            config.spouse_offset_y = v;
        }
        if let Some(v) = self.multi_spouse_gap {
            config.multi_spouse_gap = v;
        }
        if let Some(v) = self.extra_spouse_height {
            config.extra_spouse_height = v;
        }
        if let Some(v) = self.export_padding {
            config.export_padding = v;
        }
    }
}

/// Parses a camelCase JSON or JSON5 document over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let parsed: ConfigFile = json5::from_str(contents).context("invalid layout config")?;
    let mut config = LayoutConfig::default();
    parsed.merge_into(&mut config);
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in config {}", path.display()))
}
