mod common;

use circle_detector::image::ImageU8;
use circle_detector::{CircleDetector, CircleParams, Polarity};
use common::synthetic_image::{disk_u8, flat_u8, paint_disk};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn view(buffer: &[u8], width: usize, height: usize) -> ImageU8<'_> {
    ImageU8 {
        w: width,
        h: height,
        stride: width,
        data: buffer,
    }
}

#[test]
fn recovers_a_synthetic_bright_circle() {
    init_logs();
    let (w, h) = (128usize, 128usize);
    let buffer = disk_u8(w, h, 64.0, 60.0, 20.0, 30, 220);

    let params = CircleParams::new(10.0, 30.0);
    let detector = CircleDetector::new(params);
    let found = detector.detect(view(&buffer, w, h)).unwrap();

    assert_eq!(found.len(), 1, "circles={:?}", found.circles);
    let c = &found.circles[0];
    assert!((c.col - 64.0).abs() <= 1.0, "col={}", c.col);
    assert!((c.row - 60.0).abs() <= 1.0, "row={}", c.row);
    assert!((c.radius - 20.0).abs() <= 1.0, "radius={}", c.radius);
    assert!(c.metric >= 0.05, "metric={}", c.metric);
}

#[test]
fn flat_images_never_produce_circles() {
    init_logs();
    let (w, h) = (96usize, 96usize);
    let buffer = flat_u8(w, h, 128);

    for sensitivity in [0.5, 0.85, 0.95, 1.0] {
        let mut params = CircleParams::new(5.0, 25.0);
        params.sensitivity = sensitivity;
        let detector = CircleDetector::new(params);
        let found = detector.detect(view(&buffer, w, h)).unwrap();
        assert!(found.is_empty(), "sensitivity={} found circles", sensitivity);
    }
}

#[test]
fn detection_is_deterministic() {
    init_logs();
    let (w, h) = (128usize, 128usize);
    let buffer = disk_u8(w, h, 50.0, 70.0, 16.0, 40, 210);
    let detector = CircleDetector::new(CircleParams::new(8.0, 24.0));

    let first = detector.detect(view(&buffer, w, h)).unwrap();
    let second = detector.detect(view(&buffer, w, h)).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.circles.iter().zip(&second.circles) {
        assert!((a.row - b.row).abs() < 1e-6);
        assert!((a.col - b.col).abs() < 1e-6);
        assert!((a.radius - b.radius).abs() < 1e-6);
        assert!((a.metric - b.metric).abs() < 1e-6);
    }
}

#[test]
fn polarity_symmetry_recovers_the_same_circle() {
    init_logs();
    let (w, h) = (128usize, 128usize);
    let bright = disk_u8(w, h, 64.0, 64.0, 18.0, 30, 220);
    let dark = disk_u8(w, h, 64.0, 64.0, 18.0, 220, 30);

    let bright_params = CircleParams::new(10.0, 28.0);
    let mut dark_params = CircleParams::new(10.0, 28.0);
    dark_params.polarity = Polarity::Dark;

    let found_bright = CircleDetector::new(bright_params)
        .detect(view(&bright, w, h))
        .unwrap();
    let found_dark = CircleDetector::new(dark_params)
        .detect(view(&dark, w, h))
        .unwrap();

    assert_eq!(found_bright.len(), 1);
    assert_eq!(found_dark.len(), 1);
    let b = &found_bright.circles[0];
    let d = &found_dark.circles[0];
    assert!((b.col - d.col).abs() <= 1.0);
    assert!((b.row - d.row).abs() <= 1.0);
    assert!((b.radius - d.radius).abs() <= 1.0);
}

#[test]
fn sensitivity_is_monotonic_in_candidate_count() {
    init_logs();
    let (w, h) = (160usize, 160usize);
    // One strong and one low-contrast disk.
    let mut buffer = flat_u8(w, h, 30);
    paint_disk(&mut buffer, w, 45.0, 45.0, 16.0, 30, 220);
    paint_disk(&mut buffer, w, 110.0, 110.0, 20.0, 30, 90);

    let mut counts = Vec::new();
    for sensitivity in [0.85, 0.92, 0.97, 0.99] {
        let mut params = CircleParams::new(10.0, 28.0);
        params.sensitivity = sensitivity;
        let detector = CircleDetector::new(params);
        let found = detector.detect(view(&buffer, w, h)).unwrap();
        counts.push(found.len());
    }
    for pair in counts.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "counts decreased with sensitivity: {:?}",
            counts
        );
    }
}

#[test]
fn chunk_size_does_not_change_the_result() {
    init_logs();
    let (w, h) = (128usize, 128usize);
    let buffer = disk_u8(w, h, 64.0, 64.0, 15.0, 25, 230);

    let default_params = CircleParams::new(8.0, 22.0);
    // Force one edge pixel per chunk: working set = one ladder row.
    let mut tiny_chunks = CircleParams::new(8.0, 22.0);
    tiny_chunks.accum.max_working_set = 29;

    let found_default = CircleDetector::new(default_params)
        .detect(view(&buffer, w, h))
        .unwrap();
    let found_tiny = CircleDetector::new(tiny_chunks)
        .detect(view(&buffer, w, h))
        .unwrap();

    assert_eq!(found_default.len(), found_tiny.len());
    for (a, b) in found_default.circles.iter().zip(&found_tiny.circles) {
        assert!((a.row - b.row).abs() < 1e-3);
        assert!((a.col - b.col).abs() < 1e-3);
        assert!((a.radius - b.radius).abs() < 1e-3);
        assert!((a.metric - b.metric).abs() < 1e-3);
    }
}
