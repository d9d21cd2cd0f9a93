//! End-to-end runs of both favicon generators.

use std::{collections::BTreeSet, fs, path::Path};

use favicon::{
    classic, ico, optimized,
    render::{svg_document, FontConfig, IconGeometry, IconPalette},
    ClassicConfig, OptimizedConfig,
};

/// Lists the file names in a directory.
fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("failed to list output directory")
        .map(|entry| {
            entry
                .expect("failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

/// An optimized config that never looks for fonts.
fn fontless_config() -> OptimizedConfig {
    OptimizedConfig {
        font: FontConfig {
            preferred_font: "does/not/exist.ttf".into(),
            use_system_fonts: false,
            ..FontConfig::default()
        },
        ..OptimizedConfig::default()
    }
}

#[test]
fn classic_favicon_is_a_single_16x16_icon() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let assets = classic::generate(&ClassicConfig::default(), dir.path())
        .expect("failed to generate classic favicon");

    let path = dir.path().join("favicon.ico");
    assert_eq!(assets.files, vec![path.clone()]);

    let bytes = fs::read(&path).expect("failed to read favicon.ico");
    assert_eq!(bytes.len(), 6 + 16 + 40 + 16 * 16 * 4);

    // Bottom row, first pixel: background amber as BGRA.
    assert_eq!(&bytes[62..66], &[0x06, 0x77, 0xd9, 0xff]);
    // Rows are bottom-up, so the centre row (8) is the 8th stored row and its
    // centre pixel is in the stripe.
    let stripe = 62 + (7 * 16 + 8) * 4;
    assert_eq!(&bytes[stripe..stripe + 4], &[0x06, 0x77, 0xd9, 0xff]);
    // Row 3 from the top is stored 13th, centre pixel is white ball.
    let ball = 62 + (12 * 16 + 8) * 4;
    assert_eq!(&bytes[ball..ball + 4], &[0xff, 0xff, 0xff, 0xff]);
}

#[test]
fn classic_favicon_is_reproducible() {
    let first = tempfile::tempdir().expect("failed to create temp dir");
    let second = tempfile::tempdir().expect("failed to create temp dir");

    classic::generate(&ClassicConfig::default(), first.path()).expect("first run failed");
    classic::generate(&ClassicConfig::default(), second.path()).expect("second run failed");

    assert_eq!(
        fs::read(first.path().join("favicon.ico")).expect("missing first icon"),
        fs::read(second.path().join("favicon.ico")).expect("missing second icon"),
    );
}

#[test]
fn optimized_set_leaves_only_final_assets() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let assets =
        optimized::generate(&fontless_config(), dir.path()).expect("failed to generate favicons");

    let expected: BTreeSet<String> = ["apple-touch-icon.png", "favicon-192x192.png", "favicon.ico"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(file_names(dir.path()), expected);
    assert_eq!(
        assets.files,
        vec![
            dir.path().join("favicon-192x192.png"),
            dir.path().join("favicon.ico"),
            dir.path().join("apple-touch-icon.png"),
        ],
        "listed in the order they were written"
    );

    let retained = image::open(dir.path().join("favicon-192x192.png")).expect("bad 192 png");
    assert_eq!((retained.width(), retained.height()), (192, 192));

    let touch = image::open(dir.path().join("apple-touch-icon.png")).expect("bad touch icon");
    assert_eq!((touch.width(), touch.height()), (180, 180));

    let ico_bytes = fs::read(dir.path().join("favicon.ico")).expect("missing favicon.ico");
    assert_eq!(ico_bytes.len(), 6 + 16 + 40 + 48 * 48 * 4);
    assert_eq!(&ico_bytes[6..8], &[48, 48], "directory entry dimensions");
}

#[test]
fn optimized_set_never_fails_for_want_of_fonts() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    // Whatever the machine has installed, from nothing to Arial itself.
    optimized::generate(&OptimizedConfig::default(), dir.path())
        .expect("font availability must not fail the run");

    assert!(dir.path().join("favicon.ico").exists());
}

#[test]
fn optimized_ico_matches_48px_render() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = OptimizedConfig {
        sizes: vec![48],
        retained_size: 48,
        ..fontless_config()
    };

    optimized::generate(&config, dir.path()).expect("failed to generate favicons");

    let png = image::open(dir.path().join("favicon-48x48.png"))
        .expect("bad 48 png")
        .into_rgba8();
    let expected = ico::encode(&[png]).expect("failed to encode");
    let written = fs::read(dir.path().join("favicon.ico")).expect("missing favicon.ico");
    assert_eq!(written, expected);
}

#[test]
fn svg_for_48px_icon() {
    let document = svg_document(
        &IconGeometry::for_size(48),
        &IconPalette::default(),
        Some("Arial"),
    );

    insta::assert_snapshot!(document, @r##"
    <svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48">
    <circle cx="24.5" cy="24.5" r="16" fill="#ffffff" stroke="#374151" stroke-width="1"/>
    <rect x="9" y="21" width="31" height="7" fill="#d97706"/>
    <text x="24.5" y="24.5" font-family="'Arial', sans-serif" font-size="12" text-anchor="middle" dominant-baseline="central" fill="#374151">8</text>
    </svg>
    "##);
}

#[test]
fn svg_for_192px_icon() {
    let document = svg_document(
        &IconGeometry::for_size(192),
        &IconPalette::default(),
        None,
    );

    insta::assert_snapshot!(document, @r##"
    <svg xmlns="http://www.w3.org/2000/svg" width="192" height="192" viewBox="0 0 192 192">
    <circle cx="96.5" cy="96.5" r="64.5" fill="#ffffff" stroke="#374151" stroke-width="6"/>
    <rect x="35" y="82" width="123" height="29" fill="#d97706"/>
    </svg>
    "##);
}
