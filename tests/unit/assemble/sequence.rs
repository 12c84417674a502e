use crate::assemble::sink::InMemorySink;

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

fn write_png(path: &Path, shade: u8) {
    let img = image::RgbaImage::from_fn(3, 2, |x, y| {
        image::Rgba([shade, x as u8 * 10, y as u8 * 10, 255])
    });
    img.save(path).unwrap();
}

#[test]
fn frames_follow_input_order_and_match_source_decode() {
    let tmp = temp_dir("assemble_order");
    std::fs::create_dir_all(&tmp).unwrap();
    let paths: Vec<PathBuf> = [30u8, 10, 20]
        .iter()
        .enumerate()
        .map(|(i, shade)| {
            let p = tmp.join(format!("f{i}.png"));
            write_png(&p, *shade);
            p
        })
        .collect();

    let mut sink = InMemorySink::new();
    let n = assemble(&paths, Duration::from_millis(250), &mut sink).unwrap();
    assert_eq!(n, 3);
    assert!(sink.is_finished());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            frame_delay: Duration::from_millis(250),
            frame_count: 3
        })
    );
    for (frame, path) in sink.frames().iter().zip(&paths) {
        assert_eq!(frame, &decode_frame(path).unwrap());
    }
    assert_eq!(sink.frames()[0].data[0], 30);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn bad_frame_aborts_assembly() {
    let tmp = temp_dir("assemble_bad");
    std::fs::create_dir_all(&tmp).unwrap();
    let good = tmp.join("a.png");
    let bad = tmp.join("b.png");
    write_png(&good, 1);
    std::fs::write(&bad, b"garbage").unwrap();

    let mut sink = InMemorySink::new();
    let err = assemble(&[good, bad], Duration::from_millis(100), &mut sink).unwrap_err();
    assert!(matches!(err, SplashError::Image(_)));
    assert!(!sink.is_finished());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn empty_input_never_starts_the_sink() {
    let mut sink = InMemorySink::new();
    let err = assemble(&[], Duration::from_millis(100), &mut sink).unwrap_err();
    assert!(matches!(err, SplashError::NoData(_)));
    assert!(sink.config().is_none());
}

#[test]
fn folder_frames_are_filtered_and_sorted_by_name() {
    let tmp = temp_dir("assemble_folder");
    std::fs::create_dir_all(tmp.join("sub.png")).unwrap();
    for name in ["b.PNG", "a.jpg", "c.gif", "notes.txt", "d.jpeg"] {
        std::fs::write(tmp.join(name), b"x").unwrap();
    }

    let names: Vec<String> = collect_folder_frames(&tmp)
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.jpg", "b.PNG", "c.gif", "d.jpeg"]);

    assert!(collect_folder_frames(&tmp.join("missing")).is_err());
    std::fs::remove_dir_all(&tmp).ok();
}
