use std::path::PathBuf;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "splashgif_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 30) as u8, (y * 40) as u8, 200, 255])
    });
    img.save(path).unwrap();
}

#[test]
fn resolution_parses_and_validates() {
    assert_eq!(
        "1977x946".parse::<Resolution>().unwrap(),
        Resolution::new(1977, 946)
    );
    assert_eq!(
        " 8 X 4".parse::<Resolution>().unwrap(),
        Resolution::new(8, 4)
    );
    assert!("1977".parse::<Resolution>().is_err());
    assert!("0x10".parse::<Resolution>().is_err());
    assert!("ax10".parse::<Resolution>().is_err());
    assert_eq!(Resolution::new(3, 2).to_string(), "3x2");
}

#[test]
fn resize_overwrites_with_exact_dimensions() {
    let tmp = temp_dir("resize_exact");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("splash_3.4.png");
    write_png(&path, 8, 6);

    resize_in_place(&path, Resolution::new(4, 2)).unwrap();
    let out = image::open(&path).unwrap();
    assert_eq!((out.width(), out.height()), (4, 2));
    assert!(!staging_path(&path).exists());
    assert_eq!(std::fs::read_dir(&tmp).unwrap().count(), 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn resize_is_idempotent_at_target_size() {
    let tmp = temp_dir("resize_idem");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("splash_3.6.png");
    write_png(&path, 5, 3);
    let before = image::open(&path).unwrap().to_rgba8();

    resize_in_place(&path, Resolution::new(5, 3)).unwrap();
    resize_in_place(&path, Resolution::new(5, 3)).unwrap();
    let after = image::open(&path).unwrap().to_rgba8();
    assert_eq!(after.dimensions(), (5, 3));
    assert_eq!(before, after);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn undecodable_file_is_left_untouched() {
    let tmp = temp_dir("resize_bad");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("splash_1.0.png");
    std::fs::write(&path, b"not an image").unwrap();

    let err = resize_in_place(&path, Resolution::new(4, 2)).unwrap_err();
    assert!(matches!(err, SplashError::Image(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"not an image");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn failed_encode_keeps_original_bytes() {
    let tmp = temp_dir("resize_encode_fail");
    std::fs::create_dir_all(&tmp).unwrap();
    // Icons cannot be wider than 256 pixels, so decoding works and encoding the result fails.
    let path = tmp.join("splash_2.0.ico");
    write_png(&path, 16, 16);
    let before = std::fs::read(&path).unwrap();

    let err = resize_in_place(&path, Resolution::new(300, 300)).unwrap_err();
    assert!(matches!(err, SplashError::Image(_)));
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(image::open(&path).unwrap().width(), 16);
    assert!(!staging_path(&path).exists());

    std::fs::remove_dir_all(&tmp).ok();
}
