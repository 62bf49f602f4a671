use super::*;
use crate::model::preset::preset_by_id;
use crate::model::style::TextAlignment;
use crate::text::fixed::FixedAdvanceTypesetter;

fn config() -> RenderConfig {
    let mut cfg = RenderConfig::from_preset(preset_by_id("editorial").unwrap());
    cfg.quote_text = "Test quote".to_owned();
    cfg.author_text = "Test Author".to_owned();
    cfg.quote_alignment = TextAlignment::Center;
    cfg.author_alignment = TextAlignment::Center;
    cfg.filter_intensity = 50;
    cfg
}

fn images() -> (DecodedImage, DecodedImage) {
    (
        DecodedImage::solid(32, 18, [230, 220, 200, 255]).unwrap(),
        DecodedImage::solid(18, 18, [128, 128, 128, 255]).unwrap(),
    )
}

#[test]
fn render_returns_layout_and_paints_text_last() {
    let (bg, filter) = images();
    let mut renderer = PosterRenderer::new(AspectRatio::Square).unwrap();
    let mut ts = FixedAdvanceTypesetter::new(10.0);
    let layout = renderer.render(&config(), &bg, &filter, &mut ts).unwrap();

    assert_eq!(layout.quote.lines, vec!["Test quote"]);
    assert_eq!(layout.author.lines, vec!["Test Author"]);
    assert_eq!(
        layout.author.y - (layout.quote.y + layout.quote.total_height),
        40.0
    );
    assert_eq!(ts.filled.len(), 2);
    assert_eq!(ts.filled[0].0, "Test quote");
    assert_eq!(ts.filled[1].0, "Test Author");

    // Text box (#333333) sits on top of the multiplied background.
    let img = renderer.surface().to_rgba_image().unwrap();
    let text_px = img
        .get_pixel(540, (layout.quote.y + 10.0) as u32)
        .0;
    assert_eq!(text_px, [0x33, 0x33, 0x33, 255]);
    let bg_px = img.get_pixel(5, 5).0;
    assert!(bg_px[0] < 230 && bg_px[0] > 150, "{bg_px:?}");
}

#[test]
fn split_render_matches_full_render() {
    let (bg, filter) = images();
    let cfg = config();

    let mut full = PosterRenderer::new(AspectRatio::Square).unwrap();
    full.render(&cfg, &bg, &filter, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();

    let mut split = PosterRenderer::new(AspectRatio::Square).unwrap();
    split
        .render_background(&bg, &filter, cfg.filter_opacity())
        .unwrap();
    split
        .render_text(&cfg, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();

    assert_eq!(full.surface().pixels(), split.surface().pixels());
}

#[test]
fn render_is_idempotent() {
    let (bg, filter) = images();
    let cfg = config();
    let mut renderer = PosterRenderer::new(AspectRatio::Square).unwrap();
    let mut ts = FixedAdvanceTypesetter::new(10.0);

    renderer.render(&cfg, &bg, &filter, &mut ts).unwrap();
    let first = renderer.encode(ImageFormat::Png, None).unwrap();
    renderer.render(&cfg, &bg, &filter, &mut ts).unwrap();
    let second = renderer.encode(ImageFormat::Png, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_intensity_leaves_background_untouched() {
    let (bg, filter) = images();
    let mut with_filter = PosterRenderer::new(AspectRatio::Square).unwrap();
    with_filter.render_background(&bg, &filter, 0.0).unwrap();

    let mut plain = Surface::new(AspectRatio::Square).unwrap();
    plain.draw_cover(&bg).unwrap();
    assert_eq!(with_filter.surface().pixels(), plain.pixels());
}

#[test]
fn render_follows_config_aspect_ratio() {
    let (bg, filter) = images();
    let mut cfg = config();
    cfg.aspect_ratio = AspectRatio::Portrait;

    let mut renderer = PosterRenderer::new(AspectRatio::Square).unwrap();
    let layout = renderer
        .render(&cfg, &bg, &filter, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();
    assert_eq!(renderer.dimensions().height, 1350);
    assert_eq!(renderer.aspect_ratio(), AspectRatio::Portrait);
    let expected_start = 100.0 + (1150.0 - layout.total_height) / 2.0;
    assert_eq!(layout.quote.y, expected_start);
}

#[test]
fn set_aspect_ratio_keeps_content_when_unchanged() {
    let (bg, filter) = images();
    let mut renderer = PosterRenderer::new(AspectRatio::Square).unwrap();
    renderer.render_background(&bg, &filter, 0.5).unwrap();
    let before = renderer.surface().pixels().to_vec();

    renderer.set_aspect_ratio(AspectRatio::Square).unwrap();
    assert_eq!(renderer.surface().pixels(), before.as_slice());

    renderer.set_aspect_ratio(AspectRatio::Portrait).unwrap();
    assert!(renderer.surface().pixels().iter().all(|b| *b == 0));
}

#[tokio::test]
async fn serialization_passthroughs() {
    let (bg, filter) = images();
    let mut renderer = PosterRenderer::new(AspectRatio::Square).unwrap();
    renderer.render_background(&bg, &filter, 0.5).unwrap();

    let blob = renderer.to_blob(ImageFormat::Jpeg, Some(0.9)).await.unwrap();
    assert_eq!(&blob[..2], &[0xFF, 0xD8]);
    let url = renderer.to_data_url(ImageFormat::Png, None).unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
}

#[test]
fn intensity_above_100_renders_like_full_strength() {
    let (bg, filter) = images();
    let mut over = config();
    over.filter_intensity = 150;
    let mut full = config();
    full.filter_intensity = 100;

    let mut a = PosterRenderer::new(AspectRatio::Square).unwrap();
    a.render(&over, &bg, &filter, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();
    let mut b = PosterRenderer::new(AspectRatio::Square).unwrap();
    b.render(&full, &bg, &filter, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();
    assert_eq!(a.surface().pixels(), b.surface().pixels());
}
