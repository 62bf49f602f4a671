use super::*;

fn style() -> TypographyStyle {
    TypographyStyle {
        font_family: "Crimson Text".to_owned(),
        font_weight: 600,
        font_style: FontStyle::Italic,
        font_size: 48.0,
        line_height: 1.7,
        color: TextColor::parse("#333333").unwrap(),
    }
}

#[test]
fn font_spec_matches_css_shorthand() {
    assert_eq!(style().font_spec(), "italic 600 48px \"Crimson Text\"");

    let mut s = style();
    s.font_style = FontStyle::Normal;
    s.font_size = 52.5;
    assert_eq!(s.font_spec(), "normal 600 52.5px \"Crimson Text\"");
}

#[test]
fn line_height_px_multiplies() {
    assert!((style().line_height_px() - 81.6).abs() < 1e-9);
}

#[test]
fn validate_rejects_non_positive_values() {
    assert!(style().validate().is_ok());

    let mut s = style();
    s.font_size = 0.0;
    assert!(s.validate().is_err());

    let mut s = style();
    s.font_weight = 0;
    assert!(s.validate().is_err());

    let mut s = style();
    s.line_height = f64::NAN;
    assert!(s.validate().is_err());

    let mut s = style();
    s.font_family = " ".to_owned();
    assert!(s.validate().is_err());
}

#[test]
fn alignment_parse_and_serde() {
    assert_eq!("Center".parse::<TextAlignment>().unwrap(), TextAlignment::Center);
    assert!("justify".parse::<TextAlignment>().is_err());
    assert_eq!(
        serde_json::to_string(&TextAlignment::Right).unwrap(),
        "\"right\""
    );
}

#[test]
fn style_serde_uses_camel_case() {
    let v = serde_json::to_value(style()).unwrap();
    assert_eq!(v["fontFamily"], "Crimson Text");
    assert_eq!(v["fontStyle"], "italic");
    assert_eq!(v["color"], "#333333");

    let back: TypographyStyle = serde_json::from_value(v).unwrap();
    assert_eq!(back, style());
}
