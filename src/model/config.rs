use serde::{Deserialize, Serialize};

use crate::foundation::error::{LeafletError, LeafletResult};
use crate::model::canvas::{AspectRatio, CanvasDimensions};
use crate::model::preset::{DEFAULTS, PresetConfig, preset_by_id};
use crate::model::style::TextAlignment;

/// Everything one render reads. Renderers borrow it and never mutate it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub preset: PresetConfig,
    pub quote_text: String,
    pub author_text: String,
    pub quote_alignment: TextAlignment,
    pub author_alignment: TextAlignment,
    /// 0..=100.
    pub filter_intensity: u8,
    pub aspect_ratio: AspectRatio,
}

impl RenderConfig {
    /// Config for `preset` with its default alignments and intensity and the default texts.
    pub fn from_preset(preset: &PresetConfig) -> Self {
        Self {
            preset: preset.clone(),
            quote_text: DEFAULTS.quote_text.to_owned(),
            author_text: DEFAULTS.author_text.to_owned(),
            quote_alignment: preset.default_quote_alignment,
            author_alignment: preset.default_author_alignment,
            filter_intensity: preset.default_filter_opacity,
            aspect_ratio: DEFAULTS.aspect_ratio,
        }
    }

    /// Filter overlay opacity in `[0, 1]`; intensities above 100 clamp to full strength.
    pub fn filter_opacity(&self) -> f32 {
        f32::from(self.filter_intensity.min(100)) / 100.0
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.aspect_ratio.dimensions()
    }

    /// Check both typography styles. Intensity is not checked here: it clamps at draw time.
    pub fn validate(&self) -> LeafletResult<()> {
        self.preset.quote_style.validate()?;
        self.preset.author_style.validate()
    }
}

/// File form of a render request. Missing fields fall back to preset and app defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PosterSpec {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub quote_alignment: Option<TextAlignment>,
    #[serde(default)]
    pub author_alignment: Option<TextAlignment>,
    #[serde(default)]
    pub filter_intensity: Option<u8>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

impl PosterSpec {
    pub fn from_json_str(s: &str) -> LeafletResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| LeafletError::validation(format!("invalid poster spec: {e}")))
    }

    /// Look up the preset and fill every missing field.
    pub fn resolve(&self) -> LeafletResult<RenderConfig> {
        let id = self.preset.as_deref().unwrap_or(DEFAULTS.preset_id);
        let preset = preset_by_id(id)
            .ok_or_else(|| LeafletError::validation(format!("unknown preset \"{id}\"")))?;

        let mut cfg = RenderConfig::from_preset(preset);
        if let Some(q) = &self.quote {
            cfg.quote_text = q.clone();
        }
        if let Some(a) = &self.author {
            cfg.author_text = a.clone();
        }
        if let Some(a) = self.quote_alignment {
            cfg.quote_alignment = a;
        }
        if let Some(a) = self.author_alignment {
            cfg.author_alignment = a;
        }
        if let Some(i) = self.filter_intensity {
            if i > 100 {
                return Err(LeafletError::validation(format!(
                    "filter intensity must be within 0..=100, got {i}"
                )));
            }
            cfg.filter_intensity = i;
        }
        if let Some(r) = self.aspect_ratio {
            cfg.aspect_ratio = r;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
