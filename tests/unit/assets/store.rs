use std::io::Cursor;

use super::*;
use crate::model::preset::preset_by_id;

fn write_png(path: &Path, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn load_decodes_once_and_caches() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("images/bg.png"), [200, 100, 50, 255]);

    let mut store = ImageStore::new(dir.path());
    let a = store.load("images/bg.png").unwrap();
    assert_eq!((a.width, a.height), (4, 2));
    assert!(store.is_loaded("images/./bg.png"));

    std::fs::remove_file(dir.path().join("images/bg.png")).unwrap();
    let b = store.load("images/bg.png").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(store.len(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ImageStore::new(dir.path());
    let err = store.load("nope.png").unwrap_err();
    assert!(err.to_string().contains("nope.png"));
    assert!(store.is_empty());
}

#[test]
fn clear_image_and_clear() {
    let mut store = ImageStore::new("unused");
    store
        .insert("a.png", DecodedImage::solid(1, 1, [0, 0, 0, 255]).unwrap())
        .unwrap();
    store
        .insert("b.png", DecodedImage::solid(1, 1, [0, 0, 0, 255]).unwrap())
        .unwrap();
    assert_eq!(store.loaded_paths(), vec!["a.png", "b.png"]);

    store.clear_image("a.png");
    store.clear_image("../bogus");
    assert!(!store.is_loaded("a.png"));
    assert_eq!(store.len(), 1);

    store.clear();
    assert!(store.is_empty());
}

#[test]
fn load_render_images_uses_preset_paths() {
    let preset = preset_by_id("classic").unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join(&preset.background_url), [10, 20, 30, 255]);
    write_png(&dir.path().join(&preset.filter_url), [250, 240, 230, 255]);

    let mut store = ImageStore::new(dir.path());
    let images = store.load_render_images(preset).unwrap();
    assert_eq!(&images.background.rgba8_premul[..4], &[10, 20, 30, 255]);
    assert_eq!(&images.filter.rgba8_premul[..4], &[250, 240, 230, 255]);
    assert_eq!(store.len(), 2);
}
