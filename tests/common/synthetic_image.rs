/// Generates a uniform image with no gradient structure.
pub fn flat_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}

/// Renders a filled disk with a one-pixel anti-aliased rim on a flat
/// background, so the boundary produces a clean gradient ring.
pub fn disk_u8(
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    background: u8,
    foreground: u8,
) -> Vec<u8> {
    let mut img = vec![background; width * height];
    paint_disk(&mut img, width, cx, cy, radius, background, foreground);
    img
}

/// Adds another disk to an existing buffer.
pub fn paint_disk(
    img: &mut [u8],
    width: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    background: u8,
    foreground: u8,
) {
    let height = img.len() / width;
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                let v = background as f32 + (foreground as f32 - background as f32) * coverage;
                img[y * width + x] = v.round() as u8;
            }
        }
    }
}
