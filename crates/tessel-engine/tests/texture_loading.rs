use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use tessel_engine::render::{Command, HeadlessBackend};
use tessel_engine::texture::{TextureError, TexturePreset, WrapMode, load_texture, loader::decode_file};

fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
    let mut img = RgbaImage::from_pixel(w, h, Rgba([0, 0, 255, 255]));
    // marker in the file's top-left corner
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn loads_png_with_default_params() {
    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "checker.png", 8, 4);

    let mut b = HeadlessBackend::new();
    let tex = load_texture(&mut b, &path, None).unwrap();
    assert_eq!((tex.width(), tex.height()), (8, 4));
    assert_eq!(*tex.params(), TexturePreset::default_params());

    let created = b.commands().iter().any(|c| {
        matches!(c, Command::CreateTexture { width: 8, height: 4, mip_levels, .. } if *mip_levels > 1)
    });
    assert!(created);
}

#[test]
fn preset_selects_wrap_mode() {
    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "wrap.png", 2, 2);

    let mut b = HeadlessBackend::new();
    let preset = TexturePreset::from_index(11).unwrap();
    let tex = load_texture(&mut b, &path, Some(preset)).unwrap();
    assert_eq!(tex.params().wrap_s, WrapMode::ClampToEdge);
    assert_eq!(tex.params().wrap_t, WrapMode::Repeat);
}

#[test]
fn decoded_rows_are_bottom_up() {
    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "flip.png", 4, 4);

    let image = decode_file(&path).unwrap();
    let base = image.levels().next().unwrap();
    assert_eq!(base.get_pixel(0, 3), &Rgba([255, 0, 0, 255]));
    assert_eq!(base.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
}

#[test]
fn garbage_file_is_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let mut b = HeadlessBackend::new();
    let err = load_texture(&mut b, &path, None).unwrap_err();
    assert!(matches!(err, TextureError::Decode { .. }));
    assert!(b.commands().is_empty());
}

#[test]
fn backend_failure_surfaces_as_resource_error() {
    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "ok.png", 2, 2);

    let mut b = HeadlessBackend::new();
    b.set_fail_resources(true);
    let err = load_texture(&mut b, &path, None).unwrap_err();
    assert!(matches!(err, TextureError::Resource(_)));
}
