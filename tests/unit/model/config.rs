use super::*;
use crate::model::preset::default_preset;

#[test]
fn from_preset_resets_alignment_and_intensity() {
    let preset = preset_by_id("modern").unwrap();
    let cfg = RenderConfig::from_preset(preset);
    assert_eq!(cfg.preset.id, "modern");
    assert_eq!(cfg.quote_alignment, TextAlignment::Left);
    assert_eq!(cfg.author_alignment, TextAlignment::Right);
    assert_eq!(cfg.filter_intensity, 50);
    assert_eq!(cfg.quote_text, DEFAULTS.quote_text);
    assert_eq!(cfg.author_text, DEFAULTS.author_text);
    assert_eq!(cfg.aspect_ratio, AspectRatio::Square);
}

#[test]
fn filter_opacity_is_a_fraction() {
    let mut cfg = RenderConfig::from_preset(default_preset());
    cfg.filter_intensity = 0;
    assert_eq!(cfg.filter_opacity(), 0.0);
    cfg.filter_intensity = 50;
    assert_eq!(cfg.filter_opacity(), 0.5);
    cfg.filter_intensity = 100;
    assert_eq!(cfg.filter_opacity(), 1.0);
}

#[test]
fn intensity_above_100_validates_and_clamps() {
    let mut cfg = RenderConfig::from_preset(default_preset());
    cfg.filter_intensity = 150;
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.filter_opacity(), 1.0);
}

#[test]
fn validate_rejects_bad_typography() {
    let mut cfg = RenderConfig::from_preset(default_preset());
    cfg.preset.author_style.font_size = 0.0;
    assert!(matches!(
        cfg.validate().unwrap_err(),
        LeafletError::Validation(_)
    ));
}

#[test]
fn empty_spec_resolves_to_defaults() {
    let cfg = PosterSpec::default().resolve().unwrap();
    assert_eq!(cfg, RenderConfig::from_preset(default_preset()));
}

#[test]
fn spec_fields_override_defaults() {
    let spec = PosterSpec::from_json_str(
        r#"{
            "preset": "classic",
            "quote": "Test quote",
            "author": "Test Author",
            "quoteAlignment": "center",
            "filterIntensity": 80,
            "aspectRatio": "4:5"
        }"#,
    )
    .unwrap();
    let cfg = spec.resolve().unwrap();
    assert_eq!(cfg.preset.id, "classic");
    assert_eq!(cfg.quote_text, "Test quote");
    assert_eq!(cfg.author_text, "Test Author");
    assert_eq!(cfg.quote_alignment, TextAlignment::Center);
    assert_eq!(cfg.author_alignment, TextAlignment::Right);
    assert_eq!(cfg.filter_intensity, 80);
    assert_eq!(cfg.dimensions().height, 1350);
}

#[test]
fn unknown_preset_and_bad_intensity_are_rejected() {
    let spec = PosterSpec {
        preset: Some("vaporwave".to_owned()),
        ..PosterSpec::default()
    };
    let err = spec.resolve().unwrap_err();
    assert!(err.to_string().contains("vaporwave"));

    let spec = PosterSpec {
        filter_intensity: Some(150),
        ..PosterSpec::default()
    };
    assert!(spec.resolve().is_err());
}

#[test]
fn spec_json_rejects_unknown_fields() {
    assert!(PosterSpec::from_json_str(r#"{ "colour": "red" }"#).is_err());
    assert!(PosterSpec::from_json_str(r#"{ "aspectRatio": "16:9" }"#).is_err());
}
