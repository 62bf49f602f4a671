use super::*;
use crate::foundation::core::Point;
use crate::model::preset::preset_by_id;
use crate::model::style::{TextAlignment, TypographyStyle};
use crate::text::fixed::FixedAdvanceTypesetter;

struct NoFonts;

impl Typesetter for NoFonts {
    fn measure(&mut self, _text: &str, style: &TypographyStyle) -> LeafletResult<f64> {
        Err(LeafletError::font(format!(
            "no font for {}",
            style.font_spec()
        )))
    }

    fn fill_line(
        &mut self,
        _ctx: &mut vello_cpu::RenderContext,
        _text: &str,
        _style: &TypographyStyle,
        _alignment: TextAlignment,
        _anchor: Point,
    ) -> LeafletResult<()> {
        Err(LeafletError::font("unreachable"))
    }
}

fn config() -> RenderConfig {
    let mut cfg = RenderConfig::from_preset(preset_by_id("editorial").unwrap());
    cfg.quote_text = "Test quote".to_owned();
    cfg.author_text = "Test Author".to_owned();
    cfg.quote_alignment = TextAlignment::Center;
    cfg.author_alignment = TextAlignment::Center;
    cfg
}

fn images() -> (DecodedImage, DecodedImage) {
    (
        DecodedImage::solid(192, 108, [240, 230, 210, 255]).unwrap(),
        DecodedImage::solid(108, 108, [200, 200, 200, 255]).unwrap(),
    )
}

fn is_generated_name(name: &str, slug: &str, ext: &str) -> bool {
    let Some(rest) = name.strip_prefix(&format!("leaflet-{slug}-")) else {
        return false;
    };
    let Some(digits) = rest.strip_suffix(&format!(".{ext}")) else {
        return false;
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn slug_lowercases_and_collapses_whitespace() {
    assert_eq!(slug("Editorial"), "editorial");
    assert_eq!(slug("My Preset"), "my-preset");
    assert_eq!(slug("My \t  Big\nPreset"), "my-big-preset");
}

#[test]
fn filename_patterns() {
    assert_eq!(
        filename_at("My Preset", ImageFormat::Jpeg, 1_700_000_000_123),
        "leaflet-my-preset-1700000000123.jpg"
    );
    assert_eq!(
        filename_at("Modern", ImageFormat::Png, 7),
        "leaflet-modern-7.png"
    );
    assert!(is_generated_name(
        &filename("My Preset", ImageFormat::Jpeg),
        "my-preset",
        "jpg"
    ));
}

#[test]
fn export_dimensions_table() {
    assert_eq!(export_dimensions(AspectRatio::Square).height, 1080);
    assert_eq!(export_dimensions(AspectRatio::Portrait).height, 1350);
}

#[tokio::test]
async fn export_frame_succeeds_with_png_and_data_url() {
    let (bg, filter) = images();
    let mut ts = FixedAdvanceTypesetter::new(10.0);
    let result = export_frame(&config(), &bg, &filter, &mut ts, &ExportOptions::png()).await;

    assert!(result.success, "{:?}", result.error);
    assert!(is_generated_name(&result.filename, "editorial", "png"));
    let blob = result.blob.unwrap();
    assert!(!blob.is_empty());
    let img = image::load_from_memory(&blob).unwrap();
    assert_eq!((img.width(), img.height()), (1080, 1080));
    assert_eq!(
        result.data_url.unwrap(),
        data_url(&blob, ImageFormat::Png)
    );
    assert!(result.error.is_none());
}

#[tokio::test]
async fn export_frame_honors_format_and_filename() {
    let (bg, filter) = images();
    let mut cfg = config();
    cfg.aspect_ratio = AspectRatio::Portrait;
    let opts = ExportOptions::jpeg(Some(0.7)).with_filename("poster.jpg");

    let result = export_frame(
        &cfg,
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &opts,
    )
    .await;
    assert!(result.success);
    assert_eq!(result.filename, "poster.jpg");
    let img = image::load_from_memory(result.blob.as_deref().unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (1080, 1350));
    assert!(
        result
            .data_url
            .unwrap()
            .starts_with("data:image/jpeg;base64,")
    );
}

#[tokio::test]
async fn export_failures_are_reported_not_raised() {
    let (bg, filter) = images();

    let result = export_frame(&config(), &bg, &filter, &mut NoFonts, &ExportOptions::png()).await;
    assert!(!result.success);
    assert_eq!(result.filename, "");
    assert!(result.blob.is_none());
    assert!(result.error.unwrap().contains("font error"));

    let mut bad = config();
    bad.preset.quote_style.line_height = 0.0;
    let result = export_frame(
        &bad,
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
    )
    .await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("validation error"));
}

#[tokio::test]
async fn export_matches_preview_for_out_of_range_intensity() {
    let (bg, filter) = images();
    let mut cfg = config();
    cfg.filter_intensity = 150;

    let mut preview = PosterRenderer::new(cfg.aspect_ratio).unwrap();
    preview
        .render(&cfg, &bg, &filter, &mut FixedAdvanceTypesetter::new(10.0))
        .unwrap();
    let expected = preview.encode(ImageFormat::Png, None).unwrap();

    let result = export_frame(
        &cfg,
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
    )
    .await;
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.blob, Some(expected));
}

#[tokio::test]
async fn export_to_data_url_is_none_on_failure() {
    let (bg, filter) = images();
    let ok = export_to_data_url(
        &config(),
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
    )
    .await;
    assert!(ok.unwrap().starts_with("data:image/png;base64,"));

    let failed =
        export_to_data_url(&config(), &bg, &filter, &mut NoFonts, &ExportOptions::png()).await;
    assert!(failed.is_none());
}

#[tokio::test]
async fn export_leaves_caller_surfaces_alone() {
    let (bg, filter) = images();
    let mut preview = PosterRenderer::new(AspectRatio::Portrait).unwrap();
    preview.render_background(&bg, &filter, 0.1).unwrap();
    let before = preview.surface().pixels().to_vec();

    let result = export_frame(
        &config(),
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
    )
    .await;
    assert!(result.success);
    assert_eq!(preview.surface().pixels(), before.as_slice());
    assert_eq!(preview.aspect_ratio(), AspectRatio::Portrait);
}

#[tokio::test]
async fn download_writes_one_file_and_no_temporaries() {
    let (bg, filter) = images();
    let dir = tempfile::tempdir().unwrap();
    let result = download(
        &config(),
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
        dir.path(),
    )
    .await;

    assert!(result.success, "{:?}", result.error);
    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![result.filename.clone()]);
    assert!(is_generated_name(&entries[0], "editorial", "png"));

    let path = result.path.unwrap();
    assert_eq!(
        std::fs::read(&path).unwrap(),
        result.blob.unwrap(),
        "saved bytes match the blob"
    );
}

#[tokio::test]
async fn download_failure_keeps_filename_and_cleans_up() {
    let (bg, filter) = images();
    let dir = tempfile::tempdir().unwrap();
    let opts = ExportOptions::png().with_filename("nested/poster.png");
    let result = download(
        &config(),
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &opts,
        dir.path(),
    )
    .await;

    assert!(!result.success);
    assert_eq!(result.filename, "nested/poster.png");
    assert!(result.path.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let missing = dir.path().join("does-not-exist");
    let result = download(
        &config(),
        &bg,
        &filter,
        &mut FixedAdvanceTypesetter::new(10.0),
        &ExportOptions::png(),
        &missing,
    )
    .await;
    assert!(!result.success);
    assert!(is_generated_name(&result.filename, "editorial", "png"));
    assert!(!missing.exists());
}

#[tokio::test]
async fn download_passes_export_failures_through() {
    let (bg, filter) = images();
    let dir = tempfile::tempdir().unwrap();
    let result = download(
        &config(),
        &bg,
        &filter,
        &mut NoFonts,
        &ExportOptions::png(),
        dir.path(),
    )
    .await;
    assert!(!result.success);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
