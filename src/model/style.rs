use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::color::TextColor;
use crate::foundation::error::{LeafletError, LeafletResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontStyle {
    type Err = LeafletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            other => Err(LeafletError::validation(format!(
                "unknown font style \"{other}\" (expected normal or italic)"
            ))),
        }
    }
}

/// Horizontal alignment of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for TextAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextAlignment {
    type Err = LeafletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(LeafletError::validation(format!(
                "unknown alignment \"{other}\" (expected left, center or right)"
            ))),
        }
    }
}

/// Font and color settings for one text block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyStyle {
    pub font_family: String,
    pub font_weight: u16,
    pub font_style: FontStyle,
    /// Font size in pixels.
    pub font_size: f64,
    /// Line height as a multiple of `font_size`.
    pub line_height: f64,
    pub color: TextColor,
}

impl TypographyStyle {
    pub fn validate(&self) -> LeafletResult<()> {
        if self.font_family.trim().is_empty() {
            return Err(LeafletError::validation("font family must be non-empty"));
        }
        if self.font_weight == 0 {
            return Err(LeafletError::validation("font weight must be > 0"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(LeafletError::validation(
                "font size must be finite and > 0",
            ));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(LeafletError::validation(
                "line height must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// CSS-style font shorthand, e.g. `italic 600 48px "Crimson Text"`.
    pub fn font_spec(&self) -> String {
        format!(
            "{} {} {}px \"{}\"",
            self.font_style, self.font_weight, self.font_size, self.font_family
        )
    }

    /// Distance between consecutive baselines in pixels.
    pub fn line_height_px(&self) -> f64 {
        self.font_size * self.line_height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
