use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::assets::color::TextColor;
use crate::model::canvas::AspectRatio;
use crate::model::style::{FontStyle, TextAlignment, TypographyStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetName {
    Editorial,
    Classic,
    Modern,
}

impl PresetName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editorial => "Editorial",
            Self::Classic => "Classic",
            Self::Modern => "Modern",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named visual preset: background and filter images plus typography for both text blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    pub id: String,
    pub name: PresetName,
    pub thumbnail_url: String,
    pub background_url: String,
    pub filter_url: String,
    /// Default filter intensity, 0..=100.
    pub default_filter_opacity: u8,
    pub quote_style: TypographyStyle,
    pub author_style: TypographyStyle,
    pub default_quote_alignment: TextAlignment,
    pub default_author_alignment: TextAlignment,
}

/// Application-wide defaults.
#[derive(Clone, Copy, Debug)]
pub struct Defaults {
    pub preset_id: &'static str,
    pub filter_intensity: u8,
    pub aspect_ratio: AspectRatio,
    pub quote_text: &'static str,
    pub author_text: &'static str,
}

pub const DEFAULTS: Defaults = Defaults {
    preset_id: "editorial",
    filter_intensity: 50,
    aspect_ratio: AspectRatio::Square,
    quote_text: "Some lines stay with us longer than entire stories.",
    author_text: "— anonymous",
};

fn style(family: &str, weight: u16, font_style: FontStyle, size: f64, lh: f64) -> TypographyStyle {
    TypographyStyle {
        font_family: family.to_owned(),
        font_weight: weight,
        font_style,
        font_size: size,
        line_height: lh,
        color: TextColor::rgb(0x33, 0x33, 0x33),
    }
}

fn preset(
    name: PresetName,
    quote_style: TypographyStyle,
    author_style: TypographyStyle,
) -> PresetConfig {
    let n = name.as_str();
    PresetConfig {
        id: n.to_ascii_lowercase(),
        name,
        thumbnail_url: format!("images/preview/{n}-1350.jpg"),
        background_url: format!("images/底纹/{n}-bg-1350.jpg"),
        filter_url: format!("images/滤镜/{n}-filter-Multiply-1350.jpg"),
        default_filter_opacity: DEFAULTS.filter_intensity,
        quote_style,
        author_style,
        default_quote_alignment: TextAlignment::Left,
        default_author_alignment: TextAlignment::Right,
    }
}

static PRESETS: LazyLock<Vec<PresetConfig>> = LazyLock::new(|| {
    vec![
        preset(
            PresetName::Editorial,
            style("Crimson Text", 600, FontStyle::Normal, 56.0, 1.7),
            style("Crimson Text", 600, FontStyle::Italic, 48.0, 1.7),
        ),
        preset(
            PresetName::Classic,
            style("Averia Serif Libre", 700, FontStyle::Normal, 56.0, 1.7),
            style("Averia Serif Libre", 700, FontStyle::Italic, 48.0, 1.7),
        ),
        preset(
            PresetName::Modern,
            style("New Athena Unicode", 400, FontStyle::Normal, 52.0, 1.6),
            style("New Athena Unicode", 400, FontStyle::Normal, 40.0, 1.6),
        ),
    ]
});

/// The static preset catalog, in display order.
pub fn presets() -> &'static [PresetConfig] {
    &PRESETS
}

pub fn preset_by_id(id: &str) -> Option<&'static PresetConfig> {
    presets().iter().find(|p| p.id == id)
}

/// The first catalog entry (Editorial).
pub fn default_preset() -> &'static PresetConfig {
    &PRESETS[0]
}

#[cfg(test)]
#[path = "../../tests/unit/model/preset.rs"]
mod tests;
